//! # Validation Utilities
//!
//! Input validation helpers.

/// Check whether a typed value is acceptable for a decimal amount field.
///
/// Accepts the empty string and anything of the shape `digits[.digits]`, including
/// partial input such as `"1."` or `"."`. Signs, exponents, whitespace and a second
/// dot are rejected.
pub fn is_decimal_input(value: &str) -> bool {
    let mut seen_dot = false;
    value.chars().all(|c| match c {
        '0'..='9' => true,
        '.' if !seen_dot => {
            seen_dot = true;
            true
        }
        _ => false,
    })
}

/// Truncate a string to at most `max_chars` characters (not bytes).
pub fn truncate_chars(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_input() {
        assert!(is_decimal_input(""));
        assert!(is_decimal_input("0.5"));
        assert!(is_decimal_input("12."));
        assert!(is_decimal_input(".25"));
        assert!(!is_decimal_input("abc"));
        assert!(!is_decimal_input("1.2.3"));
        assert!(!is_decimal_input("-1"));
        assert!(!is_decimal_input("1e9"));
        assert!(!is_decimal_input(" 1"));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("☕☕☕", 2), "☕☕");
    }
}
