// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

pub mod burner;
pub mod token;
pub mod trust;
pub mod trust_factory;

use crate::chain::{self, ChainClient};
use crate::common::{Address, BlockNumber, TransactionRequest, TxHash};
use crate::network::{NetworkProfile, NetworkRegistry};
use alloy::eips::BlockNumberOrTag;
use alloy::network::TransactionBuilder;
use alloy::rpc::types::{Filter, Log};
use alloy::sol_types::{SolCall, SolEvent};
use std::fmt;
use std::str::FromStr;

pub use token::Token;
pub use trust::TrustInstance;
pub use trust_factory::TrustFactory;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unknown contract {0:?}")]
    UnknownContract(String),
}

/// Logical names of the contracts a network deploys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractName {
    Token,
    TrustFactory,
    Trust,
    Burner,
}

impl ContractName {
    pub const ALL: [ContractName; 4] = [
        ContractName::Token,
        ContractName::TrustFactory,
        ContractName::Trust,
        ContractName::Burner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractName::Token => "Token",
            ContractName::TrustFactory => "TrustFactory",
            ContractName::Trust => "Trust",
            ContractName::Burner => "Burner",
        }
    }

    /// Function and event signatures of the interface bound to this name.
    pub fn abi(&self) -> &'static [&'static str] {
        match self {
            ContractName::Token => token::ABI,
            ContractName::TrustFactory => trust_factory::ABI,
            ContractName::Trust => trust::ABI,
            ContractName::Burner => burner::ABI,
        }
    }
}

impl FromStr for ContractName {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "Token" | "MyBitToken" => Ok(ContractName::Token),
            "TrustFactory" => Ok(ContractName::TrustFactory),
            "Trust" => Ok(ContractName::Trust),
            "Burner" | "MyBitBurner" => Ok(ContractName::Burner),
            other => Err(Error::UnknownContract(other.to_string())),
        }
    }
}

impl fmt::Display for ContractName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logical contract bound to the address it lives at on one network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContractDescriptor {
    pub name: ContractName,
    pub profile: NetworkProfile,
    pub address: Address,
}

impl ContractDescriptor {
    pub fn abi(&self) -> &'static [&'static str] {
        self.name.abi()
    }
}

/// A decoded event together with where it was emitted.
#[derive(Clone, Debug)]
pub struct EventLog<E> {
    pub event: E,
    pub address: Address,
    pub block_number: Option<BlockNumber>,
    pub transaction_hash: Option<TxHash>,
}

impl<E: SolEvent> EventLog<E> {
    pub fn decode(log: &Log) -> Result<Self, alloy::sol_types::Error> {
        let decoded = log.log_decode::<E>()?;
        Ok(Self {
            address: decoded.inner.address,
            block_number: decoded.block_number,
            transaction_hash: decoded.transaction_hash,
            event: decoded.inner.data,
        })
    }
}

/// Callable handle on one deployed contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContractHandle {
    descriptor: ContractDescriptor,
}

impl ContractHandle {
    pub fn descriptor(&self) -> &ContractDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> ContractName {
        self.descriptor.name
    }

    pub fn address(&self) -> Address {
        self.descriptor.address
    }

    /// Transaction request invoking `call` on this contract on behalf of `from`.
    pub fn request<C: SolCall>(&self, from: Address, call: &C) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(from)
            .with_to(self.address())
            .with_input(call.abi_encode())
    }

    /// Read-only call, decoded with the call's return type.
    pub async fn call<C, K>(&self, client: &K, call: C) -> Result<C::Return, chain::Error>
    where
        C: SolCall,
        K: ChainClient + ?Sized,
    {
        let request = TransactionRequest::default()
            .with_to(self.address())
            .with_input(call.abi_encode());
        let output = client.call(&request).await.inspect_err(|err| {
            error!(
                "Error calling {} on {} {}: {err:?}",
                C::SIGNATURE,
                self.name(),
                self.address()
            )
        })?;
        Ok(C::abi_decode_returns(&output, true)?)
    }

    /// Every `E` event this contract has emitted, from genesis to the latest block.
    pub async fn past_events<E, K>(&self, client: &K) -> Result<Vec<EventLog<E>>, chain::Error>
    where
        E: SolEvent,
        K: ChainClient + ?Sized,
    {
        let filter = Filter::new()
            .address(self.address())
            .event_signature(E::SIGNATURE_HASH)
            .from_block(0u64)
            .to_block(BlockNumberOrTag::Latest);

        debug!("Fetching {} logs of {} {}", E::SIGNATURE, self.name(), self.address());
        let logs = client.logs(&filter).await.inspect_err(|err| {
            error!(
                "Error fetching {} logs of {}: {err:?}",
                E::SIGNATURE,
                self.address()
            )
        })?;

        let events = logs
            .iter()
            .map(EventLog::decode)
            .collect::<Result<Vec<_>, _>>()?;
        trace!("Got {} {} logs", events.len(), E::SIGNATURE);
        Ok(events)
    }
}

/// Resolves logical contract names against one [`NetworkRegistry`].
#[derive(Clone, Debug)]
pub struct ContractAccessor {
    registry: NetworkRegistry,
}

impl ContractAccessor {
    pub fn new(registry: NetworkRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &NetworkRegistry {
        &self.registry
    }

    /// Handle on `name`. An explicit `instance` address always wins over the registry entry,
    /// which is how individual Trust deployments are addressed.
    pub fn resolve(&self, name: ContractName, instance: Option<Address>) -> ContractHandle {
        let address = instance.unwrap_or_else(|| self.registry.address_of(name));
        ContractHandle {
            descriptor: ContractDescriptor {
                name,
                profile: self.registry.profile(),
                address,
            },
        }
    }

    pub fn resolve_by_name(
        &self,
        name: &str,
        instance: Option<Address>,
    ) -> Result<ContractHandle, Error> {
        let name = name.parse::<ContractName>()?;
        Ok(self.resolve(name, instance))
    }

    pub fn token(&self) -> Token {
        Token::new(self.resolve(ContractName::Token, None))
    }

    pub fn trust_factory(&self) -> TrustFactory {
        TrustFactory::new(self.resolve(ContractName::TrustFactory, None))
    }

    pub fn trust(&self, instance: Address) -> TrustInstance {
        TrustInstance::new(self.resolve(ContractName::Trust, Some(instance)))
    }
}
