// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Confirmation polling.
//!
//! A submitted transaction is resolved by asking a [`StatusSource`] for its receipt status until
//! it reports success (`"1"`) or failure (`"0"`). Any other status is treated as not yet mined
//! and retried after [`PollConfig::interval`]. A failing status request ends the poll at once.

use crate::common::TxHash;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Delay between two status requests.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);
/// Wall-clock limit for one poll.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Status request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Status endpoint returned a malformed response: {0}")]
    MalformedResponse(String),
    #[error("Transaction {tx_hash} was still pending after {attempts} status requests")]
    Timeout { tx_hash: TxHash, attempts: u32 },
    #[error("Polling of transaction {0} was cancelled")]
    Cancelled(TxHash),
}

/// Receipt status of a transaction as reported by the status endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxStatus {
    Pending,
    Success,
    Failure,
}

impl TxStatus {
    /// `"1"` is success, `"0"` is failure, anything else is still pending.
    pub fn from_code(code: &str) -> Self {
        match code {
            "1" => TxStatus::Success,
            "0" => TxStatus::Failure,
            _ => TxStatus::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TxStatus::Pending)
    }
}

/// Body of a status response. Only the top-level `status` field is read.
#[derive(Clone, Debug, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn tx_status(&self) -> TxStatus {
        TxStatus::from_code(&self.status)
    }
}

/// Source of transaction receipt statuses.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, tx_hash: TxHash) -> Result<TxStatus, Error>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    /// `None` polls until a terminal status or the timeout.
    pub max_attempts: Option<u32>,
    /// `None` disables the wall-clock limit.
    pub timeout: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
            timeout: Some(DEFAULT_POLL_TIMEOUT),
        }
    }
}

/// A resolved transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransactionOutcome {
    pub tx_hash: TxHash,
    pub status: TxStatus,
    /// Status requests issued before the status became terminal.
    pub attempts: u32,
}

impl TransactionOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == TxStatus::Success
    }
}

pub struct ConfirmationPoller<S> {
    source: S,
    config: PollConfig,
}

impl<S: StatusSource> ConfirmationPoller<S> {
    pub fn new(source: S, config: PollConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Poll until `tx_hash` reaches a terminal status.
    ///
    /// Only a pending status is retried. Transport and parse errors, exhausting the configured
    /// bounds and cancelling `cancel` all end the poll with an error.
    pub async fn wait_for(
        &self,
        tx_hash: TxHash,
        cancel: &CancellationToken,
    ) -> Result<TransactionOutcome, Error> {
        let deadline = self.config.timeout.map(|timeout| Instant::now() + timeout);
        let mut attempts = 0u32;

        loop {
            if cancel.is_cancelled() {
                warn!("Polling of {tx_hash} cancelled after {attempts} attempts");
                return Err(Error::Cancelled(tx_hash));
            }

            attempts += 1;
            let status = self
                .source
                .fetch_status(tx_hash)
                .await
                .inspect_err(|err| error!("Error fetching status of {tx_hash}: {err}"))?;

            if status.is_terminal() {
                info!("Transaction {tx_hash} resolved as {status:?} after {attempts} attempts");
                return Ok(TransactionOutcome {
                    tx_hash,
                    status,
                    attempts,
                });
            }

            if self
                .config
                .max_attempts
                .is_some_and(|max_attempts| attempts >= max_attempts)
            {
                error!("Transaction {tx_hash} still pending after {attempts} attempts");
                return Err(Error::Timeout { tx_hash, attempts });
            }
            if deadline.is_some_and(|deadline| Instant::now() + self.config.interval > deadline) {
                error!("Transaction {tx_hash} still pending at the poll deadline");
                return Err(Error::Timeout { tx_hash, attempts });
            }

            trace!("Transaction {tx_hash} pending, polling again in {:?}", self.config.interval);
            tokio::select! {
                _ = cancel.cancelled() => {
                    warn!("Polling of {tx_hash} cancelled after {attempts} attempts");
                    return Err(Error::Cancelled(tx_hash));
                }
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }
    }

    /// Poll `tx_hash` to a terminal status and report whether it succeeded.
    pub async fn confirm(&self, tx_hash: TxHash, cancel: &CancellationToken) -> Result<bool, Error> {
        Ok(self.wait_for(tx_hash, cancel).await?.succeeded())
    }
}
