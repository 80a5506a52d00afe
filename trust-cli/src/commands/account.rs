// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::Client;
use color_eyre::Result;
use trustlib::common::Address;

pub async fn show(client: &Client) -> Result<()> {
    let details = client.load_account_details().await?;
    let fee_approved = client.allowance_met(details.address).await?;

    println!("Network: {}", client.profile());
    println!("Account: {}", details.address);
    println!("Ether balance: {}", details.native_balance_eth());
    println!("MYB balance: {}", details.token_balance_scaled());
    println!("Setup fee approved: {fee_approved}");
    Ok(())
}

pub async fn allowance(client: &Client, owner: Address) -> Result<()> {
    if client.allowance_met(owner).await? {
        println!("{owner} has approved the setup fee");
    } else {
        println!("{owner} has not approved the setup fee");
    }
    Ok(())
}
