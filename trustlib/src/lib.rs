// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Client side of the MyBit Trust contracts.
//!
//! A [`TrustClient`] is built once per active network. It resolves the Token, TrustFactory,
//! Trust and Burner contracts from a [`NetworkRegistry`], issues the approve / deploy / withdraw
//! transactions through an injected [`ChainClient`] and waits for each of them to resolve through
//! a [`ConfirmationPoller`].

#[macro_use]
extern crate tracing;

pub mod chain;
pub mod common;
pub mod config;
pub mod contract;
pub mod explorer;
pub mod network;
pub mod poller;
pub mod query;
pub mod transaction;
pub mod units;

pub use chain::{ChainClient, ProviderClient};
pub use config::Config;
pub use contract::{ContractAccessor, ContractHandle, ContractName};
pub use explorer::EtherscanEndpoint;
pub use network::{BurnerSelection, NetworkProfile, NetworkRegistry, RegistryBuilder};
pub use poller::{ConfirmationPoller, PollConfig, StatusSource, TransactionOutcome, TxStatus};
pub use query::{AccountDetails, TrustAgreement, UserTrusts};

use tokio_util::sync::CancellationToken;

/// Entry point for every transaction flow and query against one network.
///
/// The network is fixed when the client is built; switching network means building a new client,
/// so a flow can never observe a registry change halfway through.
pub struct TrustClient<C, S> {
    chain: C,
    contracts: ContractAccessor,
    poller: ConfirmationPoller<S>,
    burner_selection: BurnerSelection,
    cancel: CancellationToken,
}

impl<C, S> TrustClient<C, S>
where
    C: ChainClient,
    S: StatusSource,
{
    pub fn new(chain: C, registry: NetworkRegistry, poller: ConfirmationPoller<S>) -> Self {
        Self {
            chain,
            contracts: ContractAccessor::new(registry),
            poller,
            burner_selection: BurnerSelection::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Choose how the burner address for approvals is picked. See [`BurnerSelection`].
    pub fn with_burner_selection(mut self, burner_selection: BurnerSelection) -> Self {
        self.burner_selection = burner_selection;
        self
    }

    /// Tie in-flight polls to an external token. Cancelling it ends every pending poll with
    /// [`poller::Error::Cancelled`].
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn profile(&self) -> NetworkProfile {
        self.contracts.registry().profile()
    }

    pub fn contracts(&self) -> &ContractAccessor {
        &self.contracts
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    pub fn poller(&self) -> &ConfirmationPoller<S> {
        &self.poller
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

impl TrustClient<ProviderClient, EtherscanEndpoint> {
    /// Build a client talking JSON-RPC over HTTP and polling the explorer configured for the
    /// selected network.
    pub fn connect(config: &Config) -> Result<Self, config::Error> {
        let registry = config.registry()?;
        let chain = match &config.private_key {
            Some(private_key) => ProviderClient::http_with_private_key(
                registry.rpc_url().clone(),
                private_key,
            )?,
            None => ProviderClient::http(registry.rpc_url().clone()),
        };
        let endpoint = EtherscanEndpoint::new(
            registry.status_api_url().clone(),
            config.etherscan_api_key.clone(),
        )?;
        let poller = ConfirmationPoller::new(endpoint, config.poll.clone());

        Ok(Self::new(chain, registry, poller).with_burner_selection(config.burner_selection))
    }
}
