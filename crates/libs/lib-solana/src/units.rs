//! # Token Amounts
//!
//! Conversion between user-typed decimal strings and integer base units.
//!
//! Conversion is exact string arithmetic: fractional digits beyond the token's
//! precision are dropped (floor), never rounded, so converting to base units and
//! back can only lose value, never gain it.
//!
//! ```rust
//! use lib_solana::units::{parse_lamports, TokenAmount};
//!
//! assert_eq!(parse_lamports("0.000001").unwrap(), 1_000);
//! let amount = TokenAmount::parse("1.2345678919", 9).unwrap();
//! assert_eq!(amount.to_string(), "1.234567891");
//! ```

use lib_core::AppError;
use lib_utils::validation::is_decimal_input;
use std::fmt;
use thiserror::Error;

/// Decimal precision of SOL (lamports per SOL = 10^9).
pub const SOL_DECIMALS: u8 = 9;

/// Reasons an amount string cannot be turned into base units.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("Please enter an amount")]
    Empty,
    #[error("Invalid amount")]
    Invalid,
    #[error("Amount is too large")]
    Overflow,
}

impl From<AmountError> for AppError {
    fn from(err: AmountError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// An amount in integer base units paired with its decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAmount {
    base_units: u128,
    decimals: u8,
}

impl TokenAmount {
    /// Parse a decimal string into base units, truncating extra precision.
    ///
    /// Accepts the same shapes as the amount input filter (`"1"`, `"1."`, `".5"`);
    /// a lone `"."` is invalid.
    pub fn parse(input: &str, decimals: u8) -> Result<Self, AmountError> {
        if input.is_empty() {
            return Err(AmountError::Empty);
        }
        if !is_decimal_input(input) {
            return Err(AmountError::Invalid);
        }

        let (int_part, frac_part) = match input.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (input, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(AmountError::Invalid);
        }

        let scale = 10u128.checked_pow(decimals as u32).ok_or(AmountError::Overflow)?;
        let whole = digits_to_u128(int_part)?;

        // Keep at most `decimals` fractional digits, right-padded with zeros.
        let kept: String = frac_part
            .chars()
            .chain(std::iter::repeat('0'))
            .take(decimals as usize)
            .collect();
        let fraction = digits_to_u128(&kept)?;

        let base_units = whole
            .checked_mul(scale)
            .and_then(|v| v.checked_add(fraction))
            .ok_or(AmountError::Overflow)?;

        Ok(Self { base_units, decimals })
    }

    pub fn from_base_units(base_units: u128, decimals: u8) -> Self {
        Self { base_units, decimals }
    }

    pub fn base_units(&self) -> u128 {
        self.base_units
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.base_units == 0
    }

    /// Base units as a `u64`, the width used for lamports.
    pub fn to_u64(&self) -> Result<u64, AmountError> {
        u64::try_from(self.base_units).map_err(|_| AmountError::Overflow)
    }

    /// Approximate value in whole tokens, for display and USD conversion only.
    pub fn to_f64(&self) -> f64 {
        self.base_units as f64 / 10f64.powi(self.decimals as i32)
    }
}

impl fmt::Display for TokenAmount {
    /// Exact decimal rendering with trailing fractional zeros removed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.base_units.to_string();
        let decimals = self.decimals as usize;
        if decimals == 0 {
            return f.write_str(&digits);
        }

        let padded = format!("{:0>width$}", digits, width = decimals + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
        let frac_part = frac_part.trim_end_matches('0');
        if frac_part.is_empty() {
            f.write_str(int_part)
        } else {
            write!(f, "{}.{}", int_part, frac_part)
        }
    }
}

fn digits_to_u128(digits: &str) -> Result<u128, AmountError> {
    digits.bytes().try_fold(0u128, |acc, b| {
        acc.checked_mul(10)
            .and_then(|v| v.checked_add((b - b'0') as u128))
            .ok_or(AmountError::Overflow)
    })
}

/// Parse a SOL amount string into lamports (`floor(amount * 10^9)`).
pub fn parse_lamports(input: &str) -> Result<u64, AmountError> {
    TokenAmount::parse(input, SOL_DECIMALS)?.to_u64()
}

/// Render lamports as an exact SOL decimal string.
pub fn lamports_to_sol_string(lamports: u64) -> String {
    TokenAmount::from_base_units(lamports as u128, SOL_DECIMALS).to_string()
}

/// Lamports as floating-point SOL, for display only.
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / lib_core::LAMPORTS_PER_SOL as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_micro_sol_is_one_thousand_lamports() {
        assert_eq!(parse_lamports("0.000001").unwrap(), 1_000);
    }

    #[test]
    fn test_truncates_instead_of_rounding() {
        assert_eq!(parse_lamports("0.0000000019").unwrap(), 1);
        assert_eq!(parse_lamports("0.0000000009").unwrap(), 0);
        assert_eq!(parse_lamports("1.9999999999").unwrap(), 1_999_999_999);
    }

    #[test]
    fn test_partial_inputs() {
        assert_eq!(parse_lamports("1.").unwrap(), 1_000_000_000);
        assert_eq!(parse_lamports(".5").unwrap(), 500_000_000);
        assert_eq!(parse_lamports("."), Err(AmountError::Invalid));
        assert_eq!(parse_lamports(""), Err(AmountError::Empty));
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert_eq!(parse_lamports("abc"), Err(AmountError::Invalid));
        assert_eq!(parse_lamports("1,5"), Err(AmountError::Invalid));
        assert_eq!(parse_lamports("-1"), Err(AmountError::Invalid));
    }

    #[test]
    fn test_lamport_overflow() {
        assert_eq!(parse_lamports("18446744074"), Err(AmountError::Overflow));
        assert_eq!(parse_lamports("18446744073.709551615").unwrap(), u64::MAX);
    }

    #[test]
    fn test_eighteen_decimal_tokens_fit() {
        let amount = TokenAmount::parse("1000.5", 18).unwrap();
        assert_eq!(amount.base_units(), 1_000_500_000_000_000_000_000);
        assert_eq!(amount.to_u64(), Err(AmountError::Overflow));
    }

    #[test]
    fn test_display() {
        assert_eq!(lamports_to_sol_string(1_000), "0.000001");
        assert_eq!(lamports_to_sol_string(5_000_000_000), "5");
        assert_eq!(lamports_to_sol_string(0), "0");
        assert_eq!(TokenAmount::from_base_units(42, 0).to_string(), "42");
    }

    #[test]
    fn test_validation_error_conversion() {
        let err: AppError = AmountError::Invalid.into();
        assert_eq!(err.user_message(), "Invalid amount");
    }

    /// Scale a decimal string to an integer with `scale` fractional digits.
    fn scaled(value: &str, scale: usize) -> u128 {
        let (int_part, frac_part) = value.split_once('.').unwrap_or((value, ""));
        let padded: String = frac_part.chars().chain(std::iter::repeat('0')).take(scale).collect();
        format!("{}{}", int_part, padded).trim_start_matches('0').parse().unwrap_or(0)
    }

    proptest! {
        #[test]
        fn prop_round_trip_never_increases(
            int_part in "[0-9]{1,12}",
            frac_part in "[0-9]{0,15}",
            decimals in 0u8..=18,
        ) {
            let input = if frac_part.is_empty() {
                int_part.clone()
            } else {
                format!("{}.{}", int_part, frac_part)
            };
            let amount = TokenAmount::parse(&input, decimals).unwrap();
            let rendered = amount.to_string();

            let scale = frac_part.len().max(decimals as usize);
            let original = scaled(&input, scale);
            let back = scaled(&rendered, scale);
            prop_assert!(back <= original);
            prop_assert!(original - back < 10u128.pow((scale - decimals as usize) as u32));

            // Base units survive a second pass unchanged.
            let reparsed = TokenAmount::parse(&rendered, decimals).unwrap();
            prop_assert_eq!(reparsed.base_units(), amount.base_units());
        }
    }
}
