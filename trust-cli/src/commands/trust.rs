// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::Client;
use crate::input;
use color_eyre::Result;
use prettytable::{Cell, Row, Table};
use trustlib::common::Address;
use trustlib::units::{self, ETHER_DECIMALS};
use trustlib::TrustAgreement;

pub async fn approve(client: &Client, owner: Address) -> Result<()> {
    println!("Approving the setup fee for {owner}...");
    report(client.request_approval(owner).await?, "Setup fee approved")
}

pub async fn create(
    client: &Client,
    recipient: Address,
    amount: &str,
    revokable: bool,
    blocks: u64,
) -> Result<()> {
    let details = client.load_account_details().await?;
    input::ensure_fee_balance(&details)?;

    println!("Creating a trust of {amount} ether for {recipient}...");
    let created = client
        .create_trust_with_approval(details.address, recipient, amount, revokable, blocks)
        .await?;
    report(created, "Trust created")
}

pub async fn withdraw(client: &Client, trust: Address, caller: Address) -> Result<()> {
    if !client.is_withdrawable(trust).await? {
        println!("Trust {trust} has not expired yet");
        return Ok(());
    }
    println!("Withdrawing trust {trust}...");
    report(client.withdraw(trust, caller).await?, "Trust withdrawn")
}

pub async fn withdrawable(client: &Client, trust: Address) -> Result<()> {
    if client.is_withdrawable(trust).await? {
        println!("Trust {trust} has expired and can be withdrawn");
    } else {
        println!("Trust {trust} has not expired yet");
    }
    Ok(())
}

pub async fn list(client: &Client, user: Address) -> Result<()> {
    let trusts = client.trusts_for(user).await?;

    println!("Trusts sent by {user}:");
    print_agreements(&trusts.sent);
    println!("Trusts received by {user}:");
    print_agreements(&trusts.received);
    Ok(())
}

fn report(succeeded: bool, success_message: &str) -> Result<()> {
    if succeeded {
        println!("{success_message}");
    } else {
        println!("Transaction failed");
    }
    Ok(())
}

fn print_agreements(agreements: &[TrustAgreement]) {
    if agreements.is_empty() {
        println!("  none");
        return;
    }

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Trust"),
        Cell::new("From"),
        Cell::new("To"),
        Cell::new("Ether"),
        Cell::new("Expires at block"),
        Cell::new("Revokable"),
        Cell::new("Withdrawn"),
    ]));
    for agreement in agreements {
        let expiration = agreement
            .expiration_block
            .map(|block| block.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(Row::new(vec![
            Cell::new(&agreement.trust_address.to_string()),
            Cell::new(&agreement.trustor.to_string()),
            Cell::new(&agreement.beneficiary.to_string()),
            Cell::new(&units::from_base_units(agreement.amount, ETHER_DECIMALS).to_string()),
            Cell::new(&expiration),
            Cell::new(&agreement.revokeable.to_string()),
            Cell::new(&agreement.withdrawn.to_string()),
        ]));
    }
    table.printstd();
}
