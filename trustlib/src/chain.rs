// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! The chain provider seam.
//!
//! Everything the trust flows need from a node goes through [`ChainClient`], so the flows can be
//! driven by a mock in tests and by [`ProviderClient`] against a real JSON-RPC endpoint.

use crate::common::{Address, Calldata, EthereumWallet, TransactionRequest, TxHash, U256};
use alloy::network::{Ethereum, NetworkWallet, TransactionBuilder, TransactionBuilderError};
use alloy::providers::{Provider, ProviderBuilder, ReqwestProvider};
use alloy::rpc::types::{Filter, Log};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest;
use alloy::transports::{RpcError, TransportErrorKind};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    RpcError(#[from] RpcError<TransportErrorKind>),
    #[error("Could not decode contract output: {0}")]
    AbiDecode(#[from] alloy::sol_types::Error),
    #[error("Could not sign transaction: {0}")]
    Signing(#[from] TransactionBuilderError<Ethereum>),
    #[error("Private key is invalid")]
    InvalidPrivateKey,
    #[error("The provider exposes no accounts")]
    NoAccounts,
}

/// Chain access the trust flows depend on.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Accounts the provider can sign for. The first one is the active account.
    async fn accounts(&self) -> Result<Vec<Address>, Error>;
    /// Native balance in wei.
    async fn balance(&self, account: Address) -> Result<U256, Error>;
    async fn gas_price(&self) -> Result<u128, Error>;
    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, Error>;
    /// Read-only call, returning the raw ABI-encoded output.
    async fn call(&self, request: &TransactionRequest) -> Result<Calldata, Error>;
    /// Broadcast a state-changing transaction. Returns as soon as the node accepted it.
    async fn send(&self, request: TransactionRequest) -> Result<TxHash, Error>;
    async fn logs(&self, filter: &Filter) -> Result<Vec<Log>, Error>;
}

/// [`ChainClient`] over an HTTP JSON-RPC provider.
///
/// Without a wallet, transactions are handed to the node unsigned and the node signs them with
/// one of its unlocked accounts. With a wallet, they are signed locally and broadcast raw.
pub struct ProviderClient {
    provider: ReqwestProvider,
    wallet: Option<EthereumWallet>,
}

impl ProviderClient {
    pub fn new(provider: ReqwestProvider) -> Self {
        Self {
            provider,
            wallet: None,
        }
    }

    pub fn http(rpc_url: reqwest::Url) -> Self {
        debug!("Connecting to JSON-RPC endpoint {rpc_url}");
        Self::new(ProviderBuilder::new().on_http(rpc_url))
    }

    pub fn http_with_private_key(rpc_url: reqwest::Url, private_key: &str) -> Result<Self, Error> {
        let signer: PrivateKeySigner = private_key.parse().map_err(|err| {
            error!("Error parsing private key: {err}");
            Error::InvalidPrivateKey
        })?;
        Ok(Self::http(rpc_url).with_wallet(EthereumWallet::from(signer)))
    }

    pub fn with_wallet(mut self, wallet: EthereumWallet) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub fn provider(&self) -> &ReqwestProvider {
        &self.provider
    }

    async fn sign_and_send(
        &self,
        wallet: &EthereumWallet,
        request: TransactionRequest,
    ) -> Result<TxHash, Error> {
        let from = request
            .from
            .unwrap_or_else(|| NetworkWallet::<Ethereum>::default_signer_address(wallet));
        let nonce = self.provider.get_transaction_count(from).await?;
        let chain_id = self.provider.get_chain_id().await?;
        let envelope = request
            .with_from(from)
            .with_nonce(nonce)
            .with_chain_id(chain_id)
            .build(wallet)
            .await?;
        let pending = self.provider.send_tx_envelope(envelope).await?;
        Ok(*pending.tx_hash())
    }
}

#[async_trait]
impl ChainClient for ProviderClient {
    async fn accounts(&self) -> Result<Vec<Address>, Error> {
        if let Some(wallet) = &self.wallet {
            return Ok(vec![NetworkWallet::<Ethereum>::default_signer_address(
                wallet,
            )]);
        }
        Ok(self.provider.get_accounts().await?)
    }

    async fn balance(&self, account: Address) -> Result<U256, Error> {
        Ok(self.provider.get_balance(account).await?)
    }

    async fn gas_price(&self) -> Result<u128, Error> {
        Ok(self.provider.get_gas_price().await?)
    }

    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, Error> {
        Ok(self.provider.estimate_gas(request).await?)
    }

    async fn call(&self, request: &TransactionRequest) -> Result<Calldata, Error> {
        Ok(self.provider.call(request).await?)
    }

    async fn send(&self, request: TransactionRequest) -> Result<TxHash, Error> {
        match &self.wallet {
            Some(wallet) => self.sign_and_send(wallet, request).await,
            None => {
                let pending = self.provider.send_transaction(request).await?;
                Ok(*pending.tx_hash())
            }
        }
    }

    async fn logs(&self, filter: &Filter) -> Result<Vec<Log>, Error> {
        Ok(self.provider.get_logs(filter).await?)
    }
}
