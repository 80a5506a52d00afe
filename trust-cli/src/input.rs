// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Validation of user input before it reaches the library, which trusts its callers.

use color_eyre::{eyre::eyre, Result, Section};
use trustlib::common::Address;
use trustlib::units::{self, BURN_AMOUNT_TOKENS};
use trustlib::AccountDetails;

/// Parse an address, enforcing the EIP-55 checksum when the input mixes upper and lower case.
pub(crate) fn parse_address(input: &str) -> Result<Address> {
    let input = input.trim();
    let hex = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .ok_or_else(|| eyre!("Address {input:?} must start with 0x"))?;
    if hex.len() != 40 || !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return Err(eyre!("Address {input:?} must be 40 hex characters after 0x"));
    }

    let mixed_case = hex.bytes().any(|byte| byte.is_ascii_uppercase())
        && hex.bytes().any(|byte| byte.is_ascii_lowercase());
    if mixed_case {
        let candidate = format!("0x{hex}");
        return Address::parse_checksummed(&candidate, None).map_err(|_| {
            eyre!("Address {input:?} has an invalid checksum")
                .suggestion("Check the address for typos, or enter it all in lower case")
        });
    }

    hex.parse::<Address>()
        .map_err(|err| eyre!("Address {input:?} is invalid: {err}"))
}

/// Check an ether amount is a positive number the chain can represent.
pub(crate) fn parse_amount(input: &str) -> Result<String> {
    let input = input.trim();
    let wei = units::to_base_units(input).map_err(|err| eyre!("{err}"))?;
    if wei.is_zero() {
        return Err(eyre!("The amount must be greater than zero"));
    }
    Ok(input.to_string())
}

/// Creating a trust burns the setup fee, so the account must hold it.
pub(crate) fn ensure_fee_balance(details: &AccountDetails) -> Result<()> {
    if details.can_pay_fee() {
        return Ok(());
    }
    Err(eyre!(
        "Account {} holds {} MYB but creating a trust costs {BURN_AMOUNT_TOKENS} MYB",
        details.address,
        details.token_balance_scaled()
    )
    .suggestion("Top up the account with MyBit tokens and try again"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trustlib::common::U256;

    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn accepts_checksummed_and_single_case_addresses() -> Result<()> {
        let address = parse_address(CHECKSUMMED)?;
        assert_eq!(parse_address(&CHECKSUMMED.to_lowercase())?, address);
        assert_eq!(
            parse_address("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED")?,
            address
        );
        Ok(())
    }

    #[test]
    fn rejects_bad_addresses() {
        let bad_checksum = CHECKSUMMED.replace("aA", "Aa");
        for input in [
            "",
            "5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1bea",
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beazz",
            bad_checksum.as_str(),
        ] {
            assert!(parse_address(input).is_err(), "{input:?} accepted");
        }
    }

    #[test]
    fn amounts_must_be_positive() -> Result<()> {
        assert_eq!(parse_amount(" 0.5 ")?, "0.5");
        for input in ["0", "0.0", "-1", "abc", "", "0x10", "1_000"] {
            assert!(parse_amount(input).is_err(), "{input:?} accepted");
        }
        Ok(())
    }

    #[test]
    fn fee_balance_must_cover_250_tokens() {
        let mut details = AccountDetails {
            address: Address::ZERO,
            native_balance: U256::ZERO,
            token_balance: units::burn_amount(),
        };
        assert!(ensure_fee_balance(&details).is_ok());

        details.token_balance -= U256::from(1u64);
        assert!(ensure_fee_balance(&details).is_err());
    }
}
