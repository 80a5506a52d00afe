// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Conversions between display amounts and base units.

use crate::common::{Amount, U256};

/// Decimal places of the MyBit token.
pub const TOKEN_DECIMALS: u8 = 18;
/// Decimal places of ether: wei per ether is `10^ETHER_DECIMALS`.
pub const ETHER_DECIMALS: u8 = 18;
/// Base units in one whole token or one ether.
const BASE_UNITS_PER_TOKEN: u128 = 1_000_000_000_000_000_000;
/// Tokens burnt as the setup fee of every trust.
pub const BURN_AMOUNT_TOKENS: u64 = 250;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Can't parse amount {0:?}")]
    Unparsable(String),
    #[error("Amount {0:?} has more than 18 decimal places")]
    LossOfPrecision(String),
    #[error("Amount {0:?} is too large")]
    ExcessiveValue(String),
}

/// The fee approval threshold: 250 tokens in base units.
pub fn burn_amount() -> Amount {
    U256::from(BURN_AMOUNT_TOKENS) * U256::from(BASE_UNITS_PER_TOKEN)
}

/// Parse a decimal ether amount such as `"1.5"` or `".5"` into wei.
///
/// Only plain decimal digits are accepted: no sign, radix prefix, separator or exponent.
pub fn to_base_units(amount: &str) -> Result<Amount, Error> {
    let unparsable = || Error::Unparsable(amount.to_string());
    let trimmed = amount.trim();
    let (units, fraction) = match trimmed.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (trimmed, ""),
    };
    if units.is_empty() && fraction.is_empty() {
        return Err(unparsable());
    }
    if !is_decimal(units) || !is_decimal(fraction) {
        return Err(unparsable());
    }

    let units = if units.is_empty() {
        U256::ZERO
    } else {
        units.parse::<U256>().map_err(|_| unparsable())?
    };
    let units = units
        .checked_mul(U256::from(BASE_UNITS_PER_TOKEN))
        .ok_or_else(|| Error::ExcessiveValue(amount.to_string()))?;

    let fraction = fraction.trim_end_matches('0');
    let fraction = if fraction.is_empty() {
        U256::ZERO
    } else {
        let scale = (ETHER_DECIMALS as usize)
            .checked_sub(fraction.len())
            .ok_or_else(|| Error::LossOfPrecision(amount.to_string()))?;
        let parsed = fraction
            .parse::<U256>()
            .map_err(|_| unparsable())?;
        parsed * U256::from(10u64).pow(U256::from(scale))
    };

    units
        .checked_add(fraction)
        .ok_or_else(|| Error::ExcessiveValue(amount.to_string()))
}

fn is_decimal(digits: &str) -> bool {
    digits.bytes().all(|byte| byte.is_ascii_digit())
}

/// Scale a raw amount down by `decimals` places for display.
pub fn from_base_units(raw: Amount, decimals: u8) -> f64 {
    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = raw / divisor;
    let fraction = raw % divisor;
    format!(
        "{whole}.{:0>width$}",
        fraction.to_string(),
        width = decimals as usize
    )
    .parse::<f64>()
    .unwrap_or(f64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= f64::EPSILON * b.abs().max(1.0)
    }

    #[test]
    fn burn_amount_is_250_tokens() {
        assert_eq!(
            burn_amount(),
            "250000000000000000000".parse::<U256>().expect("valid number")
        );
    }

    #[test]
    fn parses_ether_amounts() -> Result<(), Error> {
        assert_eq!(to_base_units("0")?, U256::ZERO);
        assert_eq!(to_base_units("0.")?, U256::ZERO);
        assert_eq!(to_base_units("1")?, U256::from(BASE_UNITS_PER_TOKEN));
        assert_eq!(to_base_units("1.500")?, U256::from(1_500_000_000_000_000_000u128));
        assert_eq!(to_base_units("0.000000000000000001")?, U256::from(1u64));
        assert_eq!(to_base_units(" 2 ")?, U256::from(2 * BASE_UNITS_PER_TOKEN));
        assert_eq!(to_base_units(".5")?, U256::from(BASE_UNITS_PER_TOKEN / 2));
        Ok(())
    }

    #[test]
    fn rejects_bad_amounts() {
        assert!(matches!(to_base_units(""), Err(Error::Unparsable(_))));
        assert!(matches!(to_base_units("-1"), Err(Error::Unparsable(_))));
        assert!(matches!(to_base_units("1.2.3"), Err(Error::Unparsable(_))));
        assert!(matches!(to_base_units("abc"), Err(Error::Unparsable(_))));
        assert!(matches!(to_base_units("."), Err(Error::Unparsable(_))));
        assert!(matches!(to_base_units("+1"), Err(Error::Unparsable(_))));
        assert!(matches!(to_base_units("1e3"), Err(Error::Unparsable(_))));
    }

    #[test]
    fn rejects_radix_prefixes_and_separators() {
        for amount in ["0x10", "0b11", "0o7", "1_000", "0x1.5", "1.0_5"] {
            assert!(
                matches!(to_base_units(amount), Err(Error::Unparsable(_))),
                "{amount} should be rejected"
            );
        }
        assert!(matches!(
            to_base_units("0.0000000000000000001"),
            Err(Error::LossOfPrecision(_))
        ));
    }

    #[test]
    fn scaling_inverts_conversion() -> Result<(), Error> {
        for (text, value) in [
            ("0", 0.0),
            ("1", 1.0),
            ("0.000001", 0.000001),
            ("1000000", 1_000_000.0),
        ] {
            let raw = to_base_units(text)?;
            let scaled = from_base_units(raw, ETHER_DECIMALS);
            assert!(close(scaled, value), "{text} scaled back to {scaled}");
        }
        Ok(())
    }

    #[test]
    fn scales_token_balances() {
        assert!(close(from_base_units(burn_amount(), TOKEN_DECIMALS), 250.0));
        assert!(close(from_base_units(U256::from(5u64), 1), 0.5));
        assert!(close(from_base_units(U256::from(7u64), 0), 7.0));
    }
}
