// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::chain::{self, ChainClient};
use crate::common::{Address, TransactionRequest, U256};
use crate::contract::{ContractHandle, EventLog};
use alloy::sol;
use alloy::sol_types::{SolCall, SolEvent};

sol!(
    #[allow(missing_docs)]
    #[sol(all_derives)]
    interface ITrust {
        event LogDeposit(uint256 expiration, address expirationAddress);
        event LogWithdraw(address indexed beneficiary, uint256 amount);
        event LogRevoke(address indexed trustor, uint256 amount);

        function beneficiary() external view returns (address);
        function trustor() external view returns (address);
        function revokeable() external view returns (bool);
        function expiration() external view returns (uint256);
        function blocksUntilExpiration() external view returns (uint256);
        function withdraw() external;
        function revoke() external;
    }
);

pub type DepositEvent = ITrust::LogDeposit;
pub type WithdrawEvent = ITrust::LogWithdraw;

pub(crate) const ABI: &[&str] = &[
    ITrust::beneficiaryCall::SIGNATURE,
    ITrust::trustorCall::SIGNATURE,
    ITrust::revokeableCall::SIGNATURE,
    ITrust::expirationCall::SIGNATURE,
    ITrust::blocksUntilExpirationCall::SIGNATURE,
    ITrust::withdrawCall::SIGNATURE,
    ITrust::revokeCall::SIGNATURE,
    ITrust::LogDeposit::SIGNATURE,
    ITrust::LogWithdraw::SIGNATURE,
    ITrust::LogRevoke::SIGNATURE,
];

/// One deployed trust.
pub struct TrustInstance {
    handle: ContractHandle,
}

impl TrustInstance {
    pub(crate) fn new(handle: ContractHandle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &ContractHandle {
        &self.handle
    }

    pub fn address(&self) -> Address {
        self.handle.address()
    }

    /// Blocks left before the beneficiary may withdraw. Zero once the trust has expired.
    pub async fn blocks_until_expiration<K>(&self, client: &K) -> Result<U256, chain::Error>
    where
        K: ChainClient + ?Sized,
    {
        let blocks = self
            .handle
            .call(client, ITrust::blocksUntilExpirationCall {})
            .await?
            ._0;
        debug!("Trust {} expires in {blocks} blocks", self.address());
        Ok(blocks)
    }

    pub async fn revokeable<K>(&self, client: &K) -> Result<bool, chain::Error>
    where
        K: ChainClient + ?Sized,
    {
        Ok(self
            .handle
            .call(client, ITrust::revokeableCall {})
            .await?
            ._0)
    }

    pub fn withdraw_request(&self, from: Address) -> TransactionRequest {
        self.handle.request(from, &ITrust::withdrawCall {})
    }

    pub async fn deposit_logs<K>(
        &self,
        client: &K,
    ) -> Result<Vec<EventLog<DepositEvent>>, chain::Error>
    where
        K: ChainClient + ?Sized,
    {
        self.handle.past_events(client).await
    }

    pub async fn withdrawal_logs<K>(
        &self,
        client: &K,
    ) -> Result<Vec<EventLog<WithdrawEvent>>, chain::Error>
    where
        K: ChainClient + ?Sized,
    {
        self.handle.past_events(client).await
    }
}
