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
    interface IMyBitToken {
        event Transfer(address indexed from, address indexed to, uint256 value);
        event Approval(address indexed owner, address indexed spender, uint256 value);

        function decimals() external view returns (uint8);
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 value) external returns (bool);
        function transfer(address to, uint256 value) external returns (bool);
    }
);

pub type ApprovalEvent = IMyBitToken::Approval;

pub(crate) const ABI: &[&str] = &[
    IMyBitToken::decimalsCall::SIGNATURE,
    IMyBitToken::balanceOfCall::SIGNATURE,
    IMyBitToken::allowanceCall::SIGNATURE,
    IMyBitToken::approveCall::SIGNATURE,
    IMyBitToken::transferCall::SIGNATURE,
    IMyBitToken::Transfer::SIGNATURE,
    IMyBitToken::Approval::SIGNATURE,
];

/// The MyBit token, used to pay the burn fee.
pub struct Token {
    handle: ContractHandle,
}

impl Token {
    pub(crate) fn new(handle: ContractHandle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &ContractHandle {
        &self.handle
    }

    /// Get the raw token balance of an address.
    pub async fn balance_of<K>(&self, client: &K, account: Address) -> Result<U256, chain::Error>
    where
        K: ChainClient + ?Sized,
    {
        debug!("Getting token balance of account: {account:?}");
        let balance = self
            .handle
            .call(client, IMyBitToken::balanceOfCall { owner: account })
            .await?
            ._0;
        debug!("Token balance of account: {account} is {balance}");
        Ok(balance)
    }

    /// Raw amount `spender` may still move out of `owner`'s balance.
    pub async fn allowance<K>(
        &self,
        client: &K,
        owner: Address,
        spender: Address,
    ) -> Result<U256, chain::Error>
    where
        K: ChainClient + ?Sized,
    {
        let allowance = self
            .handle
            .call(client, IMyBitToken::allowanceCall { owner, spender })
            .await?
            ._0;
        debug!("Allowance of {spender} over {owner} is {allowance}");
        Ok(allowance)
    }

    /// Request approving `spender` to move a raw `value` of `owner`'s tokens.
    pub fn approve_request(&self, owner: Address, spender: Address, value: U256) -> TransactionRequest {
        self.handle
            .request(owner, &IMyBitToken::approveCall { spender, value })
    }

    pub async fn approval_logs<K>(
        &self,
        client: &K,
    ) -> Result<Vec<EventLog<ApprovalEvent>>, chain::Error>
    where
        K: ChainClient + ?Sized,
    {
        self.handle.past_events(client).await
    }
}
