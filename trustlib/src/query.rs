// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Read-only lookups against chain state. Nothing here is cached: every call goes to the chain.

use crate::chain::{self, ChainClient};
use crate::common::{Address, Amount, BlockNumber, U256};
use crate::contract::token::ApprovalEvent;
use crate::contract::trust::{DepositEvent, WithdrawEvent};
use crate::contract::trust_factory::NewTrustEvent;
use crate::contract::EventLog;
use crate::network;
use crate::poller::StatusSource;
use crate::units::{self, ETHER_DECIMALS, TOKEN_DECIMALS};
use crate::TrustClient;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Provider(#[from] chain::Error),
    #[error(transparent)]
    Network(#[from] network::Error),
}

/// The active account with its balances in base units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccountDetails {
    pub address: Address,
    pub native_balance: Amount,
    pub token_balance: Amount,
}

impl AccountDetails {
    /// Native balance in ether.
    pub fn native_balance_eth(&self) -> f64 {
        units::from_base_units(self.native_balance, ETHER_DECIMALS)
    }

    /// Token balance in whole tokens.
    pub fn token_balance_scaled(&self) -> f64 {
        units::from_base_units(self.token_balance, TOKEN_DECIMALS)
    }

    /// Whether the token balance covers the setup fee.
    pub fn can_pay_fee(&self) -> bool {
        self.token_balance >= units::burn_amount()
    }
}

/// A trust rebuilt from the event logs of the factory and of the instance itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrustAgreement {
    pub trust_address: Address,
    pub trustor: Address,
    pub beneficiary: Address,
    /// Wei locked in the trust at creation.
    pub amount: Amount,
    pub deposit_block: Option<BlockNumber>,
    /// Block after which the beneficiary may withdraw, if the deposit was logged.
    pub expiration_block: Option<U256>,
    pub revokeable: bool,
    pub withdrawn: bool,
}

/// Trusts split by the side a user is on. A trust to oneself lands in both lists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserTrusts {
    pub sent: Vec<TrustAgreement>,
    pub received: Vec<TrustAgreement>,
}

impl<C, S> TrustClient<C, S>
where
    C: ChainClient,
    S: StatusSource,
{
    /// The first provider account with its native and token balances.
    pub async fn load_account_details(&self) -> Result<AccountDetails, Error> {
        let address = self
            .chain
            .accounts()
            .await?
            .first()
            .copied()
            .ok_or(chain::Error::NoAccounts)
            .inspect_err(|err| error!("Error loading account details: {err}"))?;
        let native_balance = self.chain.balance(address).await?;
        let token_balance = self
            .contracts
            .token()
            .balance_of(&self.chain, address)
            .await?;

        Ok(AccountDetails {
            address,
            native_balance,
            token_balance,
        })
    }

    pub async fn approval_logs(&self) -> Result<Vec<EventLog<ApprovalEvent>>, Error> {
        Ok(self.contracts.token().approval_logs(&self.chain).await?)
    }

    pub async fn trust_creation_logs(&self) -> Result<Vec<EventLog<NewTrustEvent>>, Error> {
        Ok(self
            .contracts
            .trust_factory()
            .new_trust_logs(&self.chain)
            .await?)
    }

    pub async fn deposit_logs(&self, trust: Address) -> Result<Vec<EventLog<DepositEvent>>, Error> {
        Ok(self.contracts.trust(trust).deposit_logs(&self.chain).await?)
    }

    pub async fn withdrawal_logs(
        &self,
        trust: Address,
    ) -> Result<Vec<EventLog<WithdrawEvent>>, Error> {
        Ok(self
            .contracts
            .trust(trust)
            .withdrawal_logs(&self.chain)
            .await?)
    }

    /// Whether `owner` has already approved the burner for at least the setup fee.
    pub async fn allowance_met(&self, owner: Address) -> Result<bool, Error> {
        let burner = self.approval_burner()?;
        Ok(self.allowance_of(owner, burner).await? >= units::burn_amount())
    }

    /// Whether the trust at `trust` has expired and can be withdrawn.
    pub async fn is_withdrawable(&self, trust: Address) -> Result<bool, Error> {
        let blocks = self
            .contracts
            .trust(trust)
            .blocks_until_expiration(&self.chain)
            .await?;
        Ok(blocks.is_zero())
    }

    /// Every trust the factory has deployed.
    pub async fn trust_agreements(&self) -> Result<Vec<TrustAgreement>, Error> {
        let created = self.trust_creation_logs().await?;
        debug!("Rebuilding {} trust agreements", created.len());

        let mut agreements = Vec::with_capacity(created.len());
        for log in created {
            let instance = self.contracts.trust(log.event.trustAddress);
            let expiration_block = instance
                .deposit_logs(&self.chain)
                .await?
                .first()
                .map(|deposit| deposit.event.expiration);
            let revokeable = instance.revokeable(&self.chain).await?;
            let withdrawn = !instance.withdrawal_logs(&self.chain).await?.is_empty();

            agreements.push(TrustAgreement {
                trust_address: log.event.trustAddress,
                trustor: log.event.trustor,
                beneficiary: log.event.beneficiary,
                amount: log.event.amount,
                deposit_block: log.block_number,
                expiration_block,
                revokeable,
                withdrawn,
            });
        }
        Ok(agreements)
    }

    /// Trusts `user` created and trusts `user` is the beneficiary of.
    pub async fn trusts_for(&self, user: Address) -> Result<UserTrusts, Error> {
        let mut trusts = UserTrusts::default();
        for agreement in self.trust_agreements().await? {
            if agreement.beneficiary == user {
                trusts.received.push(agreement.clone());
            }
            if agreement.trustor == user {
                trusts.sent.push(agreement);
            }
        }
        Ok(trusts)
    }

    /// The burner approvals go to under the configured [`BurnerSelection`](crate::BurnerSelection).
    pub(crate) fn approval_burner(&self) -> Result<Address, network::Error> {
        self.contracts
            .registry()
            .approval_burner_address(self.burner_selection)
            .inspect_err(|err| error!("Error selecting the approval burner: {err}"))
    }

    pub(crate) async fn allowance_of(
        &self,
        owner: Address,
        burner: Address,
    ) -> Result<Amount, chain::Error> {
        self.contracts
            .token()
            .allowance(&self.chain, owner, burner)
            .await
    }
}
