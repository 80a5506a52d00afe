// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

mod common;

use crate::common::{deployed, trust_client, ScriptedChain, ScriptedStatus, LEGACY_BURNER};
use alloy::primitives::{address, Address, U256};
use alloy::sol_types::SolCall;
use trustlib::contract::token::IMyBitToken;
use trustlib::contract::trust::ITrust;
use trustlib::contract::trust_factory::ITrustFactory;
use trustlib::poller::TxStatus;
use trustlib::transaction::Error;
use trustlib::units::burn_amount;
use trustlib::{
    BurnerSelection, ConfirmationPoller, ContractName, NetworkProfile, NetworkRegistry,
    PollConfig, TrustClient,
};

const USER: Address = address!("00000000000000000000000000000000000000a1");
const FRIEND: Address = address!("00000000000000000000000000000000000000b2");

fn calldata_of(request: &alloy::rpc::types::TransactionRequest) -> Vec<u8> {
    request
        .input
        .input()
        .map(|input| input.to_vec())
        .unwrap_or_default()
}

#[tokio::test]
async fn fresh_account_approves_then_creates() -> Result<(), Error> {
    let profile = NetworkProfile::Private;
    let token = deployed(profile, ContractName::Token);
    let chain = ScriptedChain::default()
        .with_account(USER, U256::from(10u64))
        .with_call::<IMyBitToken::allowanceCall>(token, U256::ZERO);

    let client = trust_client(chain, ScriptedStatus::default(), profile);
    let created = client
        .create_trust_with_approval(USER, FRIEND, "0.25", true, 40)
        .await?;
    assert!(created);

    let sent = client.chain().sent();
    assert_eq!(sent.len(), 2);

    let approve = IMyBitToken::approveCall {
        spender: deployed(profile, ContractName::Burner),
        value: burn_amount(),
    };
    assert_eq!(sent[0].to, Some(token.into()));
    assert_eq!(calldata_of(&sent[0]), approve.abi_encode());

    let deploy = ITrustFactory::deployTrustCall {
        beneficiary: FRIEND,
        revokeable: true,
        blocksUntilExpiration: U256::from(40u64),
    };
    assert_eq!(
        sent[1].to,
        Some(deployed(profile, ContractName::TrustFactory).into())
    );
    assert_eq!(calldata_of(&sent[1]), deploy.abi_encode());
    assert_eq!(
        sent[1].value,
        Some(U256::from(250_000_000_000_000_000u128))
    );
    assert_eq!(sent[1].gas, Some(100_000));
    assert_eq!(client.poller().source().requests(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn pending_statuses_are_polled_through() -> Result<(), Error> {
    let trust = address!("00000000000000000000000000000000000000c3");
    let client = trust_client(
        ScriptedChain::default(),
        ScriptedStatus::new([TxStatus::Pending, TxStatus::Pending, TxStatus::Success]),
        NetworkProfile::TestNet,
    );

    assert!(client.withdraw(trust, FRIEND).await?);
    assert_eq!(client.poller().source().requests(), 3);
    Ok(())
}

#[tokio::test]
async fn reverting_deploy_is_never_submitted() {
    let chain = ScriptedChain::default().reverting::<ITrustFactory::deployTrustCall>();
    let client = trust_client(chain, ScriptedStatus::default(), NetworkProfile::MainNet);

    let result = client.create_trust(USER, FRIEND, "1", false, 10).await;
    assert!(matches!(result, Err(Error::Estimation(_))));
    assert!(client.chain().sent().is_empty());
    assert_eq!(client.poller().source().requests(), 0);
}

#[tokio::test]
async fn legacy_selection_on_mainnet_approves_the_testnet_burner() -> Result<(), Error> {
    let client = trust_client(
        ScriptedChain::default(),
        ScriptedStatus::default(),
        NetworkProfile::MainNet,
    )
    .with_burner_selection(BurnerSelection::Legacy);
    assert!(client.request_approval(USER).await?);

    let sent = client.chain().sent();
    let approve = IMyBitToken::approveCall {
        spender: LEGACY_BURNER,
        value: burn_amount(),
    };
    assert_eq!(
        sent[0].to,
        Some(deployed(NetworkProfile::MainNet, ContractName::Token).into())
    );
    assert_eq!(calldata_of(&sent[0]), approve.abi_encode());
    Ok(())
}

#[tokio::test]
async fn legacy_selection_without_a_named_network_approves_the_testnet_burner(
) -> Result<(), Error> {
    let token = deployed(NetworkProfile::Private, ContractName::Token);
    let registry = NetworkRegistry::from_identifier(None)
        .with_legacy_burner(LEGACY_BURNER)
        .build()?;
    assert_eq!(registry.profile(), NetworkProfile::Private);

    let client = TrustClient::new(
        ScriptedChain::default(),
        registry,
        ConfirmationPoller::new(ScriptedStatus::default(), PollConfig::default()),
    )
    .with_burner_selection(BurnerSelection::Legacy);
    assert!(client.request_approval(USER).await?);

    let approve = IMyBitToken::approveCall {
        spender: LEGACY_BURNER,
        value: burn_amount(),
    };
    let sent = client.chain().sent();
    assert_eq!(sent[0].to, Some(token.into()));
    assert_eq!(calldata_of(&sent[0]), approve.abi_encode());
    Ok(())
}

#[tokio::test]
async fn profile_selection_on_mainnet_approves_the_mainnet_burner() -> Result<(), Error> {
    let client = trust_client(
        ScriptedChain::default(),
        ScriptedStatus::default(),
        NetworkProfile::MainNet,
    );
    assert!(client.request_approval(USER).await?);

    let approve = IMyBitToken::approveCall {
        spender: deployed(NetworkProfile::MainNet, ContractName::Burner),
        value: burn_amount(),
    };
    assert_eq!(calldata_of(&client.chain().sent()[0]), approve.abi_encode());
    Ok(())
}

#[tokio::test]
async fn failed_withdraw_resolves_false() -> Result<(), Error> {
    let trust = address!("00000000000000000000000000000000000000c3");
    let client = trust_client(
        ScriptedChain::default(),
        ScriptedStatus::new([TxStatus::Failure]),
        NetworkProfile::Private,
    );
    assert!(!client.withdraw(trust, USER).await?);

    let sent = client.chain().sent();
    assert_eq!(sent[0].to, Some(trust.into()));
    assert_eq!(calldata_of(&sent[0]), ITrust::withdrawCall {}.abi_encode());
    Ok(())
}
