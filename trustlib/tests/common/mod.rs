// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

#![allow(dead_code)]

use alloy::primitives::{address, Address, Bytes, B256, U256};
use alloy::rpc::types::{Filter, Log, TransactionRequest};
use alloy::sol_types::{SolCall, SolEvent, SolValue};
use alloy::transports::TransportErrorKind;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Mutex;
use trustlib::chain::{self, ChainClient};
use trustlib::poller::{self, StatusSource, TxStatus};
use trustlib::{
    ConfirmationPoller, ContractName, NetworkProfile, NetworkRegistry, PollConfig, TrustClient,
};

/// Burner approved by legacy burner selection off the private network.
pub const LEGACY_BURNER: Address = address!("7b7b7b7b7b7b7b7b7b7b7b7b7b7b7b7b7b7b7b7b");

/// Registry of `profile`, filling every address the network has not published with a fixed
/// per-profile stand-in.
pub fn registry(profile: NetworkProfile) -> NetworkRegistry {
    let mut builder = NetworkRegistry::builder(profile).with_legacy_burner(LEGACY_BURNER);
    for (index, name) in ContractName::ALL.into_iter().enumerate() {
        if profile.published().address_of(name).is_none() {
            let mut address = [0u8; 20];
            address[0] = profile as u8 + 1;
            address[19] = index as u8 + 1;
            builder = builder.with_contract_address(name, Address::from(address));
        }
    }
    builder.build().expect("complete registry")
}

pub fn deployed(profile: NetworkProfile, name: ContractName) -> Address {
    registry(profile).address_of(name)
}

/// In-memory chain answering from a fixed script and recording every submitted transaction.
#[derive(Default)]
pub struct ScriptedChain {
    accounts: Vec<Address>,
    balances: HashMap<Address, U256>,
    calls: HashMap<(Address, [u8; 4]), Bytes>,
    reverting: HashSet<[u8; 4]>,
    logs: Vec<Log>,
    sent: Mutex<Vec<TransactionRequest>>,
    next_hash: AtomicU8,
}

impl ScriptedChain {
    pub fn with_account(mut self, account: Address, balance: U256) -> Self {
        self.accounts.push(account);
        self.balances.insert(account, balance);
        self
    }

    /// Answer `C` calls to `to` with `output`.
    pub fn with_call<C: SolCall>(mut self, to: Address, output: impl SolValue) -> Self {
        self.calls
            .insert((to, C::SELECTOR), output.abi_encode().into());
        self
    }

    /// Fail gas estimation of every `C` call.
    pub fn reverting<C: SolCall>(mut self) -> Self {
        self.reverting.insert(C::SELECTOR);
        self
    }

    pub fn with_event<E: SolEvent>(mut self, address: Address, event: &E, block: u64) -> Self {
        let index = self.logs.len() as u8;
        self.logs.push(Log {
            inner: alloy::primitives::Log {
                address,
                data: event.encode_log_data(),
            },
            block_number: Some(block),
            transaction_hash: Some(B256::with_last_byte(index.wrapping_add(0x80))),
            ..Default::default()
        });
        self
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.sent.lock().expect("lock poisoned").clone()
    }

    fn target(request: &TransactionRequest) -> Option<(Address, [u8; 4])> {
        let to = request.to.and_then(|kind| kind.to().copied())?;
        let input = request.input.input()?;
        let selector: [u8; 4] = input.get(..4)?.try_into().ok()?;
        Some((to, selector))
    }

    fn revert() -> chain::Error {
        chain::Error::RpcError(TransportErrorKind::custom_str("execution reverted"))
    }
}

#[async_trait]
impl ChainClient for ScriptedChain {
    async fn accounts(&self) -> Result<Vec<Address>, chain::Error> {
        Ok(self.accounts.clone())
    }

    async fn balance(&self, account: Address) -> Result<U256, chain::Error> {
        Ok(self.balances.get(&account).copied().unwrap_or_default())
    }

    async fn gas_price(&self) -> Result<u128, chain::Error> {
        Ok(1_000_000_000)
    }

    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, chain::Error> {
        match Self::target(request) {
            Some((_, selector)) if self.reverting.contains(&selector) => Err(Self::revert()),
            Some(_) => Ok(100_000),
            None => Err(Self::revert()),
        }
    }

    async fn call(&self, request: &TransactionRequest) -> Result<Bytes, chain::Error> {
        Self::target(request)
            .and_then(|target| self.calls.get(&target).cloned())
            .ok_or_else(Self::revert)
    }

    async fn send(&self, request: TransactionRequest) -> Result<B256, chain::Error> {
        self.sent.lock().expect("lock poisoned").push(request);
        Ok(B256::with_last_byte(
            self.next_hash.fetch_add(1, Ordering::SeqCst),
        ))
    }

    async fn logs(&self, filter: &Filter) -> Result<Vec<Log>, chain::Error> {
        Ok(self
            .logs
            .iter()
            .filter(|log| {
                filter.address.matches(&log.inner.address)
                    && log
                        .inner
                        .data
                        .topics()
                        .first()
                        .is_some_and(|topic| filter.topics[0].matches(topic))
            })
            .cloned()
            .collect())
    }
}

/// Status source replaying a script of statuses, then reporting success.
#[derive(Default)]
pub struct ScriptedStatus {
    script: Mutex<VecDeque<TxStatus>>,
    requests: AtomicUsize,
}

impl ScriptedStatus {
    pub fn new(script: impl IntoIterator<Item = TxStatus>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusSource for ScriptedStatus {
    async fn fetch_status(&self, _tx_hash: B256) -> Result<TxStatus, poller::Error> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .script
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or(TxStatus::Success))
    }
}

pub fn trust_client(
    chain: ScriptedChain,
    status: ScriptedStatus,
    profile: NetworkProfile,
) -> TrustClient<ScriptedChain, ScriptedStatus> {
    let config = PollConfig {
        max_attempts: Some(10),
        ..PollConfig::default()
    };
    TrustClient::new(
        chain,
        registry(profile),
        ConfirmationPoller::new(status, config),
    )
}
