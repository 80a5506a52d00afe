// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use alloy::sol;
use alloy::sol_types::{SolCall, SolEvent};

sol!(
    #[allow(missing_docs)]
    #[sol(all_derives)]
    interface IMyBitBurner {
        event LogMYBBurned(address indexed tokenHolder, address indexed burningContract, uint256 amount);

        function burnTokens(address tokenHolder, uint256 amount) external returns (bool);
    }
);

/// The burner collects and destroys the setup fee. Client side only its address matters: it is
/// the spender every fee approval is granted to.
pub(crate) const ABI: &[&str] = &[
    IMyBitBurner::burnTokensCall::SIGNATURE,
    IMyBitBurner::LogMYBBurned::SIGNATURE,
];
