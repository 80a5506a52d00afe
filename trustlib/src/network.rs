// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::common::Address;
use crate::contract::ContractName;
use alloy::primitives::address;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown burner selection {0:?}, expected \"profile\" or \"legacy\"")]
    UnknownBurnerSelection(String),
    #[error("No published {name} address on {profile}, one must be configured")]
    MissingContractAddress {
        profile: NetworkProfile,
        name: ContractName,
    },
    #[error("Legacy burner selection needs the {} burner address, none is configured", NetworkProfile::TestNet)]
    MissingLegacyBurner,
}

/// Addresses of the four contracts on one network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deployment {
    pub token: Address,
    pub trust_factory: Address,
    /// Reference Trust instance. Real calls nearly always target a caller-supplied instance.
    pub trust: Address,
    pub burner: Address,
}

impl Deployment {
    pub fn address_of(&self, name: ContractName) -> Address {
        match name {
            ContractName::Token => self.token,
            ContractName::TrustFactory => self.trust_factory,
            ContractName::Trust => self.trust,
            ContractName::Burner => self.burner,
        }
    }
}

/// The addresses a network is known to host. A missing one has to be configured before a
/// [`NetworkRegistry`] can be built for that network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PublishedDeployment {
    pub token: Option<Address>,
    pub trust_factory: Option<Address>,
    pub trust: Option<Address>,
    pub burner: Option<Address>,
}

impl PublishedDeployment {
    pub fn address_of(&self, name: ContractName) -> Option<Address> {
        match name {
            ContractName::Token => self.token,
            ContractName::TrustFactory => self.trust_factory,
            ContractName::Trust => self.trust,
            ContractName::Burner => self.burner,
        }
    }

    fn set(&mut self, name: ContractName, address: Address) {
        let slot = match name {
            ContractName::Token => &mut self.token,
            ContractName::TrustFactory => &mut self.trust_factory,
            ContractName::Trust => &mut self.trust,
            ContractName::Burner => &mut self.burner,
        };
        *slot = Some(address);
    }

    fn complete(&self, profile: NetworkProfile) -> Result<Deployment, Error> {
        let address_of = |name| {
            self.address_of(name).ok_or_else(|| {
                error!("No {name} address configured for {profile}");
                Error::MissingContractAddress { profile, name }
            })
        };
        Ok(Deployment {
            token: address_of(ContractName::Token)?,
            trust_factory: address_of(ContractName::TrustFactory)?,
            trust: address_of(ContractName::Trust)?,
            burner: address_of(ContractName::Burner)?,
        })
    }
}

// Local dev chain: deterministic addresses of the first four deployments from the default
// hardhat account.
const PRIVATE_DEPLOYMENT: PublishedDeployment = PublishedDeployment {
    token: Some(address!("5FbDB2315678afecb367f032d93F642f64180aa3")),
    burner: Some(address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512")),
    trust_factory: Some(address!("9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0")),
    trust: Some(address!("Cf7Ed3AccA5a467e9e704C703E8D87F634fB0Fc9")),
};

// TODO: fill in the ropsten Trust deployment once its addresses are published.
const TESTNET_DEPLOYMENT: PublishedDeployment = PublishedDeployment {
    token: None,
    burner: None,
    trust_factory: None,
    trust: None,
};

// Only the MyBit token itself is live on mainnet.
const MAINNET_DEPLOYMENT: PublishedDeployment = PublishedDeployment {
    token: Some(address!("5d60d8d7eF6d37E16EBABc324de3bE57f135e0BC")),
    burner: None,
    trust_factory: None,
    trust: None,
};

static PRIVATE_RPC_URL: LazyLock<reqwest::Url> = LazyLock::new(|| {
    "http://localhost:8545"
        .parse()
        .expect("Invalid RPC URL")
});

static TESTNET_RPC_URL: LazyLock<reqwest::Url> = LazyLock::new(|| {
    "https://ropsten.infura.io/v3/"
        .parse()
        .expect("Invalid RPC URL")
});

static MAINNET_RPC_URL: LazyLock<reqwest::Url> = LazyLock::new(|| {
    "https://mainnet.infura.io/v3/"
        .parse()
        .expect("Invalid RPC URL")
});

static PRIVATE_STATUS_API_URL: LazyLock<reqwest::Url> = LazyLock::new(|| {
    "http://localhost:4000/api"
        .parse()
        .expect("Invalid status API URL")
});

static TESTNET_STATUS_API_URL: LazyLock<reqwest::Url> = LazyLock::new(|| {
    "https://api-ropsten.etherscan.io/api"
        .parse()
        .expect("Invalid status API URL")
});

static MAINNET_STATUS_API_URL: LazyLock<reqwest::Url> = LazyLock::new(|| {
    "https://api.etherscan.io/api"
        .parse()
        .expect("Invalid status API URL")
});

/// One of the three fixed deployments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NetworkProfile {
    #[default]
    Private,
    TestNet,
    MainNet,
}

impl NetworkProfile {
    /// Map a caller-supplied network identifier to a profile.
    ///
    /// Absent, empty or `"private"` selects [`NetworkProfile::Private`], `"ropsten"` selects
    /// [`NetworkProfile::TestNet`] and every other value falls through to
    /// [`NetworkProfile::MainNet`].
    pub fn from_identifier(identifier: Option<&str>) -> Self {
        match identifier {
            None | Some("") | Some("private") => NetworkProfile::Private,
            Some("ropsten") => NetworkProfile::TestNet,
            Some("mainnet") => NetworkProfile::MainNet,
            Some(other) => {
                warn!("Unrecognised network identifier {other:?}, falling back to mainnet");
                NetworkProfile::MainNet
            }
        }
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            NetworkProfile::Private => "private",
            NetworkProfile::TestNet => "ropsten",
            NetworkProfile::MainNet => "mainnet",
        }
    }

    pub fn published(&self) -> &'static PublishedDeployment {
        match self {
            NetworkProfile::Private => &PRIVATE_DEPLOYMENT,
            NetworkProfile::TestNet => &TESTNET_DEPLOYMENT,
            NetworkProfile::MainNet => &MAINNET_DEPLOYMENT,
        }
    }

    pub fn default_rpc_url(&self) -> &'static reqwest::Url {
        match self {
            NetworkProfile::Private => &PRIVATE_RPC_URL,
            NetworkProfile::TestNet => &TESTNET_RPC_URL,
            NetworkProfile::MainNet => &MAINNET_RPC_URL,
        }
    }

    pub fn default_status_api_url(&self) -> &'static reqwest::Url {
        match self {
            NetworkProfile::Private => &PRIVATE_STATUS_API_URL,
            NetworkProfile::TestNet => &TESTNET_STATUS_API_URL,
            NetworkProfile::MainNet => &MAINNET_STATUS_API_URL,
        }
    }
}

impl fmt::Display for NetworkProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

/// How the burner spender of an approval is chosen.
///
/// The approval flow used to pick the burner with an expression that yields the private burner
/// on the private network and the ropsten burner everywhere else, mainnet included. Which one is
/// intended has not been signed off, so both are kept behind this switch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BurnerSelection {
    /// Burner of the active profile.
    #[default]
    ProfileConsistent,
    /// Private burner on the private network, ropsten burner on every other network.
    Legacy,
}

impl FromStr for BurnerSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profile" => Ok(BurnerSelection::ProfileConsistent),
            "legacy" => Ok(BurnerSelection::Legacy),
            other => Err(Error::UnknownBurnerSelection(other.to_string())),
        }
    }
}

/// Everything needed to talk to one network: the profile, its endpoints and contract addresses.
///
/// Built once per active network and handed to the [`ContractAccessor`](crate::ContractAccessor).
/// Every contract address is known once built.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkRegistry {
    profile: NetworkProfile,
    named_private: bool,
    deployment: Deployment,
    legacy_burner: Option<Address>,
    rpc_url: reqwest::Url,
    status_api_url: reqwest::Url,
}

impl NetworkRegistry {
    /// Registry of a profile with only its published addresses.
    pub fn new(profile: NetworkProfile) -> Result<Self, Error> {
        Self::builder(profile).build()
    }

    pub fn builder(profile: NetworkProfile) -> RegistryBuilder {
        RegistryBuilder {
            profile,
            named_private: profile == NetworkProfile::Private,
            addresses: *profile.published(),
            legacy_burner: TESTNET_DEPLOYMENT.burner,
            rpc_url: profile.default_rpc_url().clone(),
            status_api_url: profile.default_status_api_url().clone(),
        }
    }

    /// Builder for the profile a caller-supplied identifier selects. Only the literal
    /// `"private"` counts as naming the private network for [`BurnerSelection::Legacy`].
    pub fn from_identifier(identifier: Option<&str>) -> RegistryBuilder {
        let mut builder = Self::builder(NetworkProfile::from_identifier(identifier));
        builder.named_private = identifier == Some(NetworkProfile::Private.identifier());
        builder
    }

    pub fn profile(&self) -> NetworkProfile {
        self.profile
    }

    pub fn address_of(&self, name: ContractName) -> Address {
        self.deployment.address_of(name)
    }

    pub fn rpc_url(&self) -> &reqwest::Url {
        &self.rpc_url
    }

    pub fn status_api_url(&self) -> &reqwest::Url {
        &self.status_api_url
    }

    /// The spender approvals are granted to.
    pub fn approval_burner_address(&self, selection: BurnerSelection) -> Result<Address, Error> {
        let own_burner = self.address_of(ContractName::Burner);
        match selection {
            BurnerSelection::ProfileConsistent => Ok(own_burner),
            BurnerSelection::Legacy
                if self.named_private || self.profile == NetworkProfile::TestNet =>
            {
                Ok(own_burner)
            }
            BurnerSelection::Legacy => {
                let burner = self.legacy_burner.ok_or(Error::MissingLegacyBurner)?;
                warn!(
                    "Legacy burner selection on {}: approving the {} burner {burner}",
                    self.profile,
                    NetworkProfile::TestNet
                );
                Ok(burner)
            }
        }
    }
}

/// Collects the endpoint and address overrides of a [`NetworkRegistry`].
#[derive(Clone, Debug)]
pub struct RegistryBuilder {
    profile: NetworkProfile,
    named_private: bool,
    addresses: PublishedDeployment,
    legacy_burner: Option<Address>,
    rpc_url: reqwest::Url,
    status_api_url: reqwest::Url,
}

impl RegistryBuilder {
    pub fn profile(&self) -> NetworkProfile {
        self.profile
    }

    /// Point one logical contract at a different deployment of the same profile.
    pub fn with_contract_address(mut self, name: ContractName, address: Address) -> Self {
        debug!(
            "Overriding {name} address on {} with {address}",
            self.profile
        );
        self.addresses.set(name, address);
        self
    }

    /// The test-network burner [`BurnerSelection::Legacy`] approves off the private network.
    pub fn with_legacy_burner(mut self, address: Address) -> Self {
        self.legacy_burner = Some(address);
        self
    }

    pub fn with_rpc_url(mut self, rpc_url: reqwest::Url) -> Self {
        self.rpc_url = rpc_url;
        self
    }

    pub fn with_status_api_url(mut self, status_api_url: reqwest::Url) -> Self {
        self.status_api_url = status_api_url;
        self
    }

    /// Fails when any of the four contracts has neither a published nor a configured address.
    pub fn build(self) -> Result<NetworkRegistry, Error> {
        let deployment = self.addresses.complete(self.profile)?;
        let legacy_burner = if self.profile == NetworkProfile::TestNet {
            Some(deployment.burner)
        } else {
            self.legacy_burner
        };
        Ok(NetworkRegistry {
            profile: self.profile,
            named_private: self.named_private,
            deployment,
            legacy_burner,
            rpc_url: self.rpc_url,
            status_api_url: self.status_api_url,
        })
    }
}
