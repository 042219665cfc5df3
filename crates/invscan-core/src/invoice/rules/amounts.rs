//! Amount parsing and currency formatting for display.
//!
//! Extracted amounts stay as matched text; these helpers are for callers
//! that render or compare them.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse an amount such as `$1,234.50` or `12.00`.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$' && *c != ',')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

/// Format an optional amount as `$N.NN`.
///
/// Absent or empty values render as `-`; text that is not a number is
/// returned unchanged.
pub fn format_currency(value: Option<&str>) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if v.trim().is_empty() => "-".to_string(),
        Some(v) => match parse_amount(v) {
            Some(amount) => format!("${:.2}", amount),
            None => v.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), Some(Decimal::from_str("1234.56").unwrap()));
        assert_eq!(parse_amount("$ 30.00"), Some(Decimal::from_str("30.00").unwrap()));
        assert_eq!(parse_amount("108"), Some(Decimal::from(108)));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("n/a"), None);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Some("1,234.5")), "$1234.50");
        assert_eq!(format_currency(Some("30")), "$30.00");
        assert_eq!(format_currency(None), "-");
        assert_eq!(format_currency(Some("")), "-");
        assert_eq!(format_currency(Some("n/a")), "n/a");
    }
}
