// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

mod account;
mod logs;
mod trust;

use crate::input;
use crate::opt::Opt;
use clap::Subcommand;
use color_eyre::{eyre::eyre, Result};
use trustlib::common::Address;
use trustlib::{ChainClient, Config, EtherscanEndpoint, ProviderClient, TrustClient};

pub(crate) type Client = TrustClient<ProviderClient, EtherscanEndpoint>;

#[derive(Subcommand, Debug)]
pub enum SubCmd {
    /// Show the active account with its ether and MYB balances.
    Account,

    /// Approve the burner to take the 250 MYB setup fee.
    Approve {
        /// Account granting the approval. Defaults to the active account.
        #[arg(long)]
        from: Option<String>,
    },

    /// Check whether an account has approved the setup fee.
    Allowance {
        /// Defaults to the active account.
        address: Option<String>,
    },

    /// Lock ether in a new trust for a recipient.
    Create {
        /// The beneficiary of the trust.
        recipient: String,
        /// Ether to lock, e.g. "0.5".
        amount: String,
        /// Number of blocks after which the recipient may withdraw.
        #[arg(long)]
        blocks: u64,
        /// Allow the trust to be revoked before it expires.
        #[arg(long, default_value = "false")]
        revokable: bool,
    },

    /// Withdraw an expired trust to its beneficiary.
    Withdraw {
        /// Address of the trust contract.
        trust: String,
    },

    /// Check whether a trust has expired.
    Withdrawable {
        /// Address of the trust contract.
        trust: String,
    },

    /// List the trusts an account created and receives.
    Trusts {
        /// Defaults to the active account.
        address: Option<String>,
    },

    /// Print contract event logs.
    Logs {
        #[command(subcommand)]
        command: LogsCmd,
    },
}

#[derive(Subcommand, Debug)]
pub enum LogsCmd {
    /// Token approvals.
    Approvals,
    /// Trusts deployed by the factory.
    Created,
    /// Deposits into one trust.
    Deposits { trust: String },
    /// Withdrawals from one trust.
    Withdrawals { trust: String },
}

pub async fn handle_subcommand(opt: Opt) -> Result<()> {
    let mut config = Config::from_env()?;
    opt.network.apply(&mut config);
    let client = TrustClient::connect(&config)?;
    info!("Connected to {} at {}", client.profile(), client.contracts().registry().rpc_url());
    cancel_on_ctrl_c(&client);

    match opt.command {
        SubCmd::Account => account::show(&client).await,
        SubCmd::Approve { from } => {
            let owner = account_or_active(&client, from.as_deref()).await?;
            trust::approve(&client, owner).await
        }
        SubCmd::Allowance { address } => {
            let owner = account_or_active(&client, address.as_deref()).await?;
            account::allowance(&client, owner).await
        }
        SubCmd::Create {
            recipient,
            amount,
            blocks,
            revokable,
        } => {
            let recipient = input::parse_address(&recipient)?;
            let amount = input::parse_amount(&amount)?;
            trust::create(&client, recipient, &amount, revokable, blocks).await
        }
        SubCmd::Withdraw { trust } => {
            let trust = input::parse_address(&trust)?;
            let caller = account_or_active(&client, None).await?;
            trust::withdraw(&client, trust, caller).await
        }
        SubCmd::Withdrawable { trust } => {
            trust::withdrawable(&client, input::parse_address(&trust)?).await
        }
        SubCmd::Trusts { address } => {
            let user = account_or_active(&client, address.as_deref()).await?;
            trust::list(&client, user).await
        }
        SubCmd::Logs { command } => match command {
            LogsCmd::Approvals => logs::approvals(&client).await,
            LogsCmd::Created => logs::created(&client).await,
            LogsCmd::Deposits { trust } => {
                logs::deposits(&client, input::parse_address(&trust)?).await
            }
            LogsCmd::Withdrawals { trust } => {
                logs::withdrawals(&client, input::parse_address(&trust)?).await
            }
        },
    }
}

/// Ctrl-C stops any confirmation poll in progress instead of killing the process mid-flow.
fn cancel_on_ctrl_c(client: &Client) {
    let cancel = client.cancellation_token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling pending confirmations");
            println!("Interrupted, no longer waiting for confirmation");
            cancel.cancel();
        }
    });
}

async fn account_or_active(client: &Client, address: Option<&str>) -> Result<Address> {
    if let Some(address) = address {
        return input::parse_address(address);
    }
    client
        .chain()
        .accounts()
        .await?
        .first()
        .copied()
        .ok_or_else(|| eyre!("The node exposes no account. Set SECRET_KEY to sign locally"))
}
