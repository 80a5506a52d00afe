// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! The state-changing trust flows.
//!
//! Every flow runs the same strictly ordered steps: estimate gas, look up the gas price,
//! submit, then hand the hash to the [`ConfirmationPoller`](crate::ConfirmationPoller).
//! Nothing before the poll is ever retried, so a transaction is submitted at most once.

use crate::chain::{self, ChainClient};
use crate::common::{Address, TransactionRequest};
use crate::network;
use crate::poller::{self, StatusSource};
use crate::units;
use crate::TrustClient;
use alloy::network::TransactionBuilder;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Gas estimation failed: {0}")]
    Estimation(#[source] chain::Error),
    #[error("Transaction submission failed: {0}")]
    Submission(#[source] chain::Error),
    #[error(transparent)]
    Provider(#[from] chain::Error),
    #[error(transparent)]
    Poll(#[from] poller::Error),
    #[error(transparent)]
    Network(#[from] network::Error),
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] units::Error),
}

impl<C, S> TrustClient<C, S>
where
    C: ChainClient,
    S: StatusSource,
{
    /// Approve the burner to take the 250 token setup fee from `owner`.
    pub async fn request_approval(&self, owner: Address) -> Result<bool, Error> {
        let burner = self.approval_burner()?;
        debug!("Requesting fee approval of {owner} for burner {burner}");
        let request = self
            .contracts
            .token()
            .approve_request(owner, burner, units::burn_amount());
        self.submit("approve", request).await
    }

    /// Deploy a trust sending `amount_eth` ether from `from` to `recipient`, releasable
    /// `deadline_blocks` blocks after it is mined.
    ///
    /// Inputs are not validated beyond what the amount conversion needs.
    pub async fn create_trust(
        &self,
        from: Address,
        recipient: Address,
        amount_eth: &str,
        revokable: bool,
        deadline_blocks: u64,
    ) -> Result<bool, Error> {
        let value = units::to_base_units(amount_eth)
            .inspect_err(|err| error!("Error converting trust amount {amount_eth:?}: {err}"))?;
        debug!(
            "Creating trust from {from} to {recipient} of {value} wei, revokable: {revokable}, expiring after {deadline_blocks} blocks"
        );
        let request = self.contracts.trust_factory().deploy_trust_request(
            from,
            recipient,
            revokable,
            deadline_blocks,
            value,
        );
        self.submit("deployTrust", request).await
    }

    /// Withdraw the balance of the trust at `trust` to its beneficiary.
    pub async fn withdraw(&self, trust: Address, caller: Address) -> Result<bool, Error> {
        debug!("Withdrawing trust {trust} as {caller}");
        let request = self.contracts.trust(trust).withdraw_request(caller);
        self.submit("withdraw", request).await
    }

    /// Create a trust, first approving the setup fee if the current allowance does not cover it.
    ///
    /// Resolves `false` without creating anything when the approval transaction fails.
    pub async fn create_trust_with_approval(
        &self,
        from: Address,
        recipient: Address,
        amount_eth: &str,
        revokable: bool,
        deadline_blocks: u64,
    ) -> Result<bool, Error> {
        let burner = self.approval_burner()?;
        if self.allowance_of(from, burner).await? < units::burn_amount() {
            info!("Allowance of {from} does not cover the setup fee, requesting approval");
            if !self.request_approval(from).await? {
                warn!("Fee approval of {from} failed, not creating the trust");
                return Ok(false);
            }
        }
        self.create_trust(from, recipient, amount_eth, revokable, deadline_blocks)
            .await
    }

    async fn submit(&self, label: &str, request: TransactionRequest) -> Result<bool, Error> {
        let gas_limit = self
            .chain
            .estimate_gas(&request)
            .await
            .inspect_err(|err| error!("Error estimating gas for {label}: {err}"))
            .map_err(Error::Estimation)?;
        let gas_price = self
            .chain
            .gas_price()
            .await
            .inspect_err(|err| error!("Error getting gas price for {label}: {err}"))?;
        debug!("{label} needs {gas_limit} gas at {gas_price} wei");

        let request = request
            .with_gas_limit(gas_limit)
            .with_gas_price(gas_price);
        let tx_hash = self
            .chain
            .send(request)
            .await
            .inspect_err(|err| error!("Error submitting {label}: {err}"))
            .map_err(Error::Submission)?;
        info!("Submitted {label} transaction {tx_hash}");

        let outcome = self.poller.wait_for(tx_hash, &self.cancel).await?;
        Ok(outcome.succeeded())
    }
}
