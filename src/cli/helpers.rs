//! Shared helper functions for CLI commands

use rust_decimal::Decimal;

/// Format a decimal for display: three places, trailing zeros dropped
pub fn fmt_decimal(value: Decimal) -> String {
    value.round_dp(3).normalize().to_string()
}

/// Format an optional decimal, with "n/a" for absent values
pub fn fmt_opt_decimal(value: Option<Decimal>) -> String {
    value.map(fmt_decimal).unwrap_or_else(|| "n/a".to_string())
}

/// Truncate a string to max_len, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fmt_decimal_rounds_and_trims() {
        assert_eq!(fmt_decimal(dec!(3.3333333333)), "3.333");
        assert_eq!(fmt_decimal(dec!(2.500)), "2.5");
        assert_eq!(fmt_decimal(dec!(10)), "10");
    }

    #[test]
    fn test_fmt_opt_decimal() {
        assert_eq!(fmt_opt_decimal(Some(dec!(1.25))), "1.25");
        assert_eq!(fmt_opt_decimal(None), "n/a");
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
    }
}
