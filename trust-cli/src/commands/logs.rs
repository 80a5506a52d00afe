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
use trustlib::contract::EventLog;
use trustlib::units::{self, ETHER_DECIMALS, TOKEN_DECIMALS};

pub async fn approvals(client: &Client) -> Result<()> {
    let logs = client.approval_logs().await?;
    print_header(logs.len(), "approval");
    for log in logs {
        println!(
            "{} {} approved {} for {} MYB",
            location(&log),
            log.event.owner,
            log.event.spender,
            units::from_base_units(log.event.value, TOKEN_DECIMALS)
        );
    }
    Ok(())
}

pub async fn created(client: &Client) -> Result<()> {
    let logs = client.trust_creation_logs().await?;
    print_header(logs.len(), "trust creation");
    for log in logs {
        println!(
            "{} {} created trust {} for {} with {} ether",
            location(&log),
            log.event.trustor,
            log.event.trustAddress,
            log.event.beneficiary,
            units::from_base_units(log.event.amount, ETHER_DECIMALS)
        );
    }
    Ok(())
}

pub async fn deposits(client: &Client, trust: Address) -> Result<()> {
    let logs = client.deposit_logs(trust).await?;
    print_header(logs.len(), "deposit");
    for log in logs {
        println!(
            "{} deposit expiring at block {}",
            location(&log),
            log.event.expiration
        );
    }
    Ok(())
}

pub async fn withdrawals(client: &Client, trust: Address) -> Result<()> {
    let logs = client.withdrawal_logs(trust).await?;
    print_header(logs.len(), "withdrawal");
    for log in logs {
        println!(
            "{} {} withdrew {} ether",
            location(&log),
            log.event.beneficiary,
            units::from_base_units(log.event.amount, ETHER_DECIMALS)
        );
    }
    Ok(())
}

fn print_header(count: usize, kind: &str) {
    let plural = if count == 1 { "" } else { "s" };
    println!("{count} {kind} log{plural}");
}

fn location<E>(log: &EventLog<E>) -> String {
    match log.block_number {
        Some(block) => format!("[block {block}]"),
        None => "[pending]".to_string(),
    }
}
