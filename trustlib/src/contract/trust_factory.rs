// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::chain::{self, ChainClient};
use crate::common::{Address, Amount, TransactionRequest, U256};
use crate::contract::{ContractHandle, EventLog};
use alloy::network::TransactionBuilder;
use alloy::sol;
use alloy::sol_types::{SolCall, SolEvent};

sol!(
    #[allow(missing_docs)]
    #[sol(all_derives)]
    interface ITrustFactory {
        event LogNewTrust(address indexed trustor, address indexed beneficiary, address trustAddress, uint256 amount);

        function deployTrust(address beneficiary, bool revokeable, uint256 blocksUntilExpiration) external payable;
    }
);

pub type NewTrustEvent = ITrustFactory::LogNewTrust;

pub(crate) const ABI: &[&str] = &[
    ITrustFactory::deployTrustCall::SIGNATURE,
    ITrustFactory::LogNewTrust::SIGNATURE,
];

/// Deploys new Trust instances, funding each with the ether sent along.
pub struct TrustFactory {
    handle: ContractHandle,
}

impl TrustFactory {
    pub(crate) fn new(handle: ContractHandle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &ContractHandle {
        &self.handle
    }

    /// Request deploying a trust for `beneficiary`, funded with `value` wei and releasable
    /// `blocks_until_expiration` blocks after it is mined.
    pub fn deploy_trust_request(
        &self,
        from: Address,
        beneficiary: Address,
        revokeable: bool,
        blocks_until_expiration: u64,
        value: Amount,
    ) -> TransactionRequest {
        let call = ITrustFactory::deployTrustCall {
            beneficiary,
            revokeable,
            blocksUntilExpiration: U256::from(blocks_until_expiration),
        };
        self.handle.request(from, &call).with_value(value)
    }

    pub async fn new_trust_logs<K>(
        &self,
        client: &K,
    ) -> Result<Vec<EventLog<NewTrustEvent>>, chain::Error>
    where
        K: ChainClient + ?Sized,
    {
        self.handle.past_events(client).await
    }
}
