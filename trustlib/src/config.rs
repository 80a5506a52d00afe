// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Environment driven configuration.

use crate::chain;
use crate::common::Address;
use crate::contract::ContractName;
use crate::network::{self, BurnerSelection, NetworkProfile, NetworkRegistry};
use crate::poller::{self, PollConfig};
use reqwest::Url;
use std::env;
use std::time::Duration;

/// Network identifier: `private`, `ropsten` or `mainnet`.
pub const TRUST_NETWORK: &str = "TRUST_NETWORK";
/// JSON-RPC endpoint overriding the profile default.
pub const RPC_URL: &str = "RPC_URL";
const RPC_URL_BUILD_TIME_VAL: Option<&str> = option_env!("RPC_URL");
/// Receipt status endpoint overriding the profile default.
pub const STATUS_API_URL: &str = "STATUS_API_URL";
const STATUS_API_URL_BUILD_TIME_VAL: Option<&str> = option_env!("STATUS_API_URL");
pub const ETHERSCAN_API_KEY: &str = "ETHERSCAN_API_KEY";
/// Hex private key to sign with locally. Without it the node signs.
pub const SECRET_KEY: &str = "SECRET_KEY";
pub const TOKEN_ADDRESS: &str = "TOKEN_ADDRESS";
pub const TRUST_FACTORY_ADDRESS: &str = "TRUST_FACTORY_ADDRESS";
pub const TRUST_ADDRESS: &str = "TRUST_ADDRESS";
pub const BURNER_ADDRESS: &str = "BURNER_ADDRESS";
/// Test-network burner approved by `legacy` burner selection off the private network.
pub const LEGACY_BURNER_ADDRESS: &str = "LEGACY_BURNER_ADDRESS";
pub const TRUST_POLL_INTERVAL_MS: &str = "TRUST_POLL_INTERVAL_MS";
pub const TRUST_POLL_MAX_ATTEMPTS: &str = "TRUST_POLL_MAX_ATTEMPTS";
/// Wall-clock poll limit in seconds. `0` disables it.
pub const TRUST_POLL_TIMEOUT_SECS: &str = "TRUST_POLL_TIMEOUT_SECS";
/// `profile` or `legacy`.
pub const BURNER_SELECTION: &str = "BURNER_SELECTION";

const CONTRACT_ADDRESS_VARS: [(ContractName, &str); 4] = [
    (ContractName::Token, TOKEN_ADDRESS),
    (ContractName::TrustFactory, TRUST_FACTORY_ADDRESS),
    (ContractName::Trust, TRUST_ADDRESS),
    (ContractName::Burner, BURNER_ADDRESS),
];

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid value {value:?} for {var}: {reason}")]
    InvalidVar {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("The {profile} network has no published {name} address, set {var}")]
    MissingContractAddress {
        profile: NetworkProfile,
        name: ContractName,
        var: &'static str,
    },
    #[error(transparent)]
    Network(#[from] network::Error),
    #[error(transparent)]
    Chain(#[from] chain::Error),
    #[error(transparent)]
    Poller(#[from] poller::Error),
}

#[derive(Clone, Debug, Default)]
pub struct Config {
    pub network: Option<String>,
    pub rpc_url: Option<Url>,
    pub status_api_url: Option<Url>,
    pub etherscan_api_key: Option<String>,
    pub private_key: Option<String>,
    pub contract_addresses: Vec<(ContractName, Address)>,
    pub legacy_burner: Option<Address>,
    pub poll: PollConfig,
    pub burner_selection: BurnerSelection,
}

impl Config {
    /// Read the configuration from the process environment, falling back to values baked in at
    /// build time for the endpoint URLs.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build the configuration from any variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        let mut network = lookup(TRUST_NETWORK);
        if network.is_none() && cfg!(feature = "local") {
            info!("Using the private network as the 'local' feature flag is enabled");
            network = Some(NetworkProfile::Private.identifier().to_string());
        }

        let rpc_url = lookup(RPC_URL)
            .or_else(|| RPC_URL_BUILD_TIME_VAL.map(|s| s.to_string()))
            .map(|value| parse_var(RPC_URL, value))
            .transpose()?;
        let status_api_url = lookup(STATUS_API_URL)
            .or_else(|| STATUS_API_URL_BUILD_TIME_VAL.map(|s| s.to_string()))
            .map(|value| parse_var(STATUS_API_URL, value))
            .transpose()?;

        let mut contract_addresses = Vec::new();
        for (name, var) in CONTRACT_ADDRESS_VARS {
            if let Some(value) = lookup(var) {
                contract_addresses.push((name, parse_var(var, value)?));
            }
        }

        let legacy_burner = lookup(LEGACY_BURNER_ADDRESS)
            .map(|value| parse_var(LEGACY_BURNER_ADDRESS, value))
            .transpose()?;

        let mut poll = PollConfig::default();
        if let Some(value) = lookup(TRUST_POLL_INTERVAL_MS) {
            poll.interval = Duration::from_millis(parse_var(TRUST_POLL_INTERVAL_MS, value)?);
        }
        if let Some(value) = lookup(TRUST_POLL_MAX_ATTEMPTS) {
            poll.max_attempts = Some(parse_var(TRUST_POLL_MAX_ATTEMPTS, value)?);
        }
        if let Some(value) = lookup(TRUST_POLL_TIMEOUT_SECS) {
            let secs: u64 = parse_var(TRUST_POLL_TIMEOUT_SECS, value)?;
            poll.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        let burner_selection = lookup(BURNER_SELECTION)
            .map(|value| parse_var(BURNER_SELECTION, value))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            network,
            rpc_url,
            status_api_url,
            etherscan_api_key: lookup(ETHERSCAN_API_KEY),
            private_key: lookup(SECRET_KEY),
            contract_addresses,
            legacy_burner,
            poll,
            burner_selection,
        })
    }

    /// Registry of the configured network with every override applied.
    ///
    /// Fails when the network lacks a published address for a contract and none is configured.
    pub fn registry(&self) -> Result<NetworkRegistry, Error> {
        let mut builder = NetworkRegistry::from_identifier(self.network.as_deref());
        info!("Using the {} network", builder.profile());

        if let Some(rpc_url) = &self.rpc_url {
            builder = builder.with_rpc_url(rpc_url.clone());
        }
        if let Some(status_api_url) = &self.status_api_url {
            builder = builder.with_status_api_url(status_api_url.clone());
        }
        for (name, address) in &self.contract_addresses {
            builder = builder.with_contract_address(*name, *address);
        }
        if let Some(legacy_burner) = self.legacy_burner {
            builder = builder.with_legacy_burner(legacy_burner);
        }

        builder.build().map_err(|err| match err {
            network::Error::MissingContractAddress { profile, name } => {
                Error::MissingContractAddress {
                    profile,
                    name,
                    var: address_var(name),
                }
            }
            other => Error::Network(other),
        })
    }
}

fn address_var(name: ContractName) -> &'static str {
    match name {
        ContractName::Token => TOKEN_ADDRESS,
        ContractName::TrustFactory => TRUST_FACTORY_ADDRESS,
        ContractName::Trust => TRUST_ADDRESS,
        ContractName::Burner => BURNER_ADDRESS,
    }
}

fn parse_var<T>(var: &'static str, value: String) -> Result<T, Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|err| {
        error!("Invalid value for {var}: {err}");
        Error::InvalidVar {
            var,
            value,
            reason: err.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, Error> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_without_any_variable() -> Result<(), Error> {
        let config = config(&[])?;
        assert_eq!(config.poll, PollConfig::default());
        assert_eq!(config.burner_selection, BurnerSelection::ProfileConsistent);
        assert!(config.contract_addresses.is_empty());
        assert!(config.private_key.is_none());
        Ok(())
    }

    #[test]
    fn overrides_reach_the_registry() -> Result<(), Error> {
        let burner = address!("00000000000000000000000000000000000000d4");
        let config = config(&[
            (TRUST_NETWORK, "ropsten"),
            (RPC_URL, "http://127.0.0.1:9545"),
            (STATUS_API_URL, "http://127.0.0.1:9000/api"),
            (TOKEN_ADDRESS, "0x00000000000000000000000000000000000000d1"),
            (TRUST_FACTORY_ADDRESS, "0x00000000000000000000000000000000000000d2"),
            (TRUST_ADDRESS, "0x00000000000000000000000000000000000000d3"),
            (BURNER_ADDRESS, "0x00000000000000000000000000000000000000d4"),
        ])?;
        let registry = config.registry()?;

        assert_eq!(registry.profile(), NetworkProfile::TestNet);
        assert_eq!(registry.rpc_url().as_str(), "http://127.0.0.1:9545/");
        assert_eq!(registry.status_api_url().as_str(), "http://127.0.0.1:9000/api");
        assert_eq!(registry.address_of(ContractName::Burner), burner);
        assert_eq!(
            registry.address_of(ContractName::Token),
            address!("00000000000000000000000000000000000000d1")
        );
        Ok(())
    }

    #[test]
    fn unpublished_networks_need_configured_addresses() -> Result<(), Error> {
        assert!(matches!(
            config(&[(TRUST_NETWORK, "ropsten")])?.registry(),
            Err(Error::MissingContractAddress {
                profile: NetworkProfile::TestNet,
                var: TOKEN_ADDRESS,
                ..
            })
        ));
        assert!(matches!(
            config(&[
                (TRUST_NETWORK, "mainnet"),
                (TRUST_FACTORY_ADDRESS, "0x00000000000000000000000000000000000000d2"),
                (TRUST_ADDRESS, "0x00000000000000000000000000000000000000d3"),
            ])?
            .registry(),
            Err(Error::MissingContractAddress {
                profile: NetworkProfile::MainNet,
                var: BURNER_ADDRESS,
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn legacy_burner_is_configurable() -> Result<(), Error> {
        let testnet_burner = address!("00000000000000000000000000000000000000b7");
        let config = config(&[
            (BURNER_SELECTION, "legacy"),
            (LEGACY_BURNER_ADDRESS, "0x00000000000000000000000000000000000000b7"),
        ])?;
        let registry = config.registry()?;
        assert_eq!(
            registry.approval_burner_address(config.burner_selection)?,
            testnet_burner
        );

        let named = config_with_network(&config, "private").registry()?;
        assert_eq!(
            named.approval_burner_address(config.burner_selection)?,
            named.address_of(ContractName::Burner)
        );
        Ok(())
    }

    fn config_with_network(config: &Config, network: &str) -> Config {
        Config {
            network: Some(network.to_string()),
            ..config.clone()
        }
    }

    #[test]
    fn parses_poll_bounds() -> Result<(), Error> {
        let config = config(&[
            (TRUST_POLL_INTERVAL_MS, "250"),
            (TRUST_POLL_MAX_ATTEMPTS, "12"),
            (TRUST_POLL_TIMEOUT_SECS, "0"),
            (BURNER_SELECTION, "legacy"),
        ])?;
        assert_eq!(config.poll.interval, Duration::from_millis(250));
        assert_eq!(config.poll.max_attempts, Some(12));
        assert_eq!(config.poll.timeout, None);
        assert_eq!(config.burner_selection, BurnerSelection::Legacy);
        Ok(())
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            config(&[(TOKEN_ADDRESS, "0x1234")]),
            Err(Error::InvalidVar { var: TOKEN_ADDRESS, .. })
        ));
        assert!(matches!(
            config(&[(TRUST_POLL_MAX_ATTEMPTS, "many")]),
            Err(Error::InvalidVar { var: TRUST_POLL_MAX_ATTEMPTS, .. })
        ));
        assert!(matches!(
            config(&[(BURNER_SELECTION, "ropsten")]),
            Err(Error::InvalidVar { var: BURNER_SELECTION, .. })
        ));
    }

    #[test]
    fn blank_variables_are_ignored() -> Result<(), Error> {
        let config = config(&[(TRUST_NETWORK, " "), (ETHERSCAN_API_KEY, "")])?;
        assert!(config.etherscan_api_key.is_none());
        assert_eq!(config.registry()?.profile(), NetworkProfile::Private);
        Ok(())
    }
}
