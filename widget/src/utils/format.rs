//! Formatting utilities for amounts and transaction links.

use chrono::{DateTime, Utc};
use lib_core::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;

/// Values below this are rendered in exponent form.
const SMALL_VALUE_THRESHOLD: f64 = 0.00001;

/// Format a number with thousands separators and at most `decimals` fraction
/// digits, trailing zeros removed.
///
/// Values below 0.00001 use exponent form, and non-finite values render as `"0"`.
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    if value < SMALL_VALUE_THRESHOLD {
        return format!("{:.*e}", decimals, value);
    }

    let fixed = format!("{:.*}", decimals, value);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let grouped = group_thousands(int_part);
    if frac_part.is_empty() {
        grouped
    } else {
        format!("{}.{}", grouped, frac_part)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Format lamports as SOL with a fixed number of decimals.
pub fn format_sol(lamports: u64, decimals: usize) -> String {
    format!("{:.*} SOL", decimals, lamports as f64 / LAMPORTS_PER_SOL as f64)
}

/// Format a USD amount as `$1,234.56`. Negative values render as `$0.00`.
pub fn format_usd(value: f64) -> String {
    let rounded = format!("{:.2}", value.max(0.0));
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    format!("${}.{}", group_thousands(int_part), frac_part)
}

/// USD value of `amount` base units of a token priced at `token_price`.
///
/// Returns 0 for an empty or unparsable amount, or a zero price.
pub fn calculate_usd_value(amount: &str, token_price: f64, decimals: u8) -> f64 {
    if amount.is_empty() || token_price == 0.0 {
        return 0.0;
    }
    match amount.parse::<f64>() {
        Ok(value) => value / 10f64.powi(decimals as i32) * token_price,
        Err(_) => 0.0,
    }
}

/// Whole-token part of `amount` base units. Fractions are truncated.
///
/// Returns `"0"` when `amount` is not an unsigned integer.
pub fn format_token_amount(amount: &str, decimals: u8) -> String {
    let Ok(value) = amount.parse::<u128>() else {
        return "0".to_string();
    };
    match 10u128.checked_pow(decimals as u32) {
        Some(divisor) => (value / divisor).to_string(),
        None => "0".to_string(),
    }
}

/// Shorten a signature to its first and last eight characters.
pub fn truncate_signature(signature: &str) -> String {
    let chars: Vec<char> = signature.chars().collect();
    if chars.len() <= 16 {
        return signature.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 8..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Explorer link for a transaction.
pub fn solscan_url(signature: &str) -> String {
    format!("https://solscan.io/tx/{}", signature)
}

/// Solana Pay URI for donating to `recipient`, rendered as a QR code by hosts.
pub fn solana_pay_uri(recipient: &Pubkey) -> String {
    format!("solana:{}", recipient)
}

/// Locale-independent timestamp for history rows.
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "pending".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(1000.0, 4), "1,000");
        assert_eq!(format_number(999.6, 0), "1,000");
        assert_eq!(format_number(0.1234567, 4), "0.1235");
        assert_eq!(format_number(0.000001, 2), "1.00e-6");
        assert_eq!(format_number(f64::NAN, 2), "0");
    }

    #[test]
    fn test_format_sol_and_usd() {
        assert_eq!(format_sol(5_000, 6), "0.000005 SOL");
        assert_eq!(format_sol(1_500_000_000, 2), "1.50 SOL");
        assert_eq!(format_usd(1234.5), "$1,234.50");
        assert_eq!(format_usd(0.756), "$0.76");
    }

    #[test]
    fn test_calculate_usd_value() {
        assert_eq!(calculate_usd_value("2500000", 2.0, 6), 5.0);
        assert_eq!(calculate_usd_value("", 2.0, 6), 0.0);
        assert_eq!(calculate_usd_value("100", 0.0, 6), 0.0);
        assert_eq!(calculate_usd_value("abc", 1.0, 6), 0.0);
    }

    #[test]
    fn test_format_token_amount_truncates() {
        assert_eq!(format_token_amount("1999999", 6), "1");
        assert_eq!(format_token_amount("999999", 6), "0");
        assert_eq!(format_token_amount("42", 0), "42");
        assert_eq!(format_token_amount("-1", 6), "0");
    }

    #[test]
    fn test_signature_helpers() {
        let sig = "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW";
        assert_eq!(truncate_signature(sig), "5VERv8NM...diSZkQUW");
        assert_eq!(truncate_signature("short"), "short");
        assert_eq!(solscan_url("abc"), "https://solscan.io/tx/abc");
    }

    #[test]
    fn test_solana_pay_uri() {
        let recipient = Pubkey::from_str("9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin").unwrap();
        assert_eq!(solana_pay_uri(&recipient), "solana:9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin");
    }

    #[test]
    fn test_format_timestamp() {
        let t = DateTime::from_timestamp(1_700_000_000, 0);
        assert_eq!(format_timestamp(t), "2023-11-14 22:13:20 UTC");
        assert_eq!(format_timestamp(None), "pending");
    }
}
