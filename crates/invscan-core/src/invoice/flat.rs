//! Flat key/value parser.
//!
//! A lighter alternative to [`RegexInvoiceParser`](super::RegexInvoiceParser):
//! a fixed table of labeled fields followed by a pass that records every
//! short `key: value` line verbatim.

use regex::Regex;
use tracing::debug;

use super::rules::patterns;
use super::InvoiceParser;
use crate::models::invoice::FlatInvoice;

const DEFAULT_MAX_KEY_CHARS: usize = 30;
const DEFAULT_MAX_VALUE_CHARS: usize = 100;

/// Labeled fields, applied in this order.
fn field_table() -> [(&'static str, &'static Regex); 12] {
    [
        ("Invoice Number", &*patterns::INVOICE_NUMBER),
        ("Invoice Date", &*patterns::INVOICE_DATE),
        ("Due Date", &*patterns::DUE_DATE),
        ("Total Amount", &*patterns::FLAT_TOTAL_AMOUNT),
        ("Subtotal", &*patterns::FLAT_SUBTOTAL),
        ("Tax", &*patterns::FLAT_TAX),
        ("Customer Name", &*patterns::FLAT_CUSTOMER_NAME),
        ("Company Name", &*patterns::FLAT_COMPANY_NAME),
        ("Email", &*patterns::EMAIL),
        ("Phone", &*patterns::FLAT_PHONE),
        ("Address", &*patterns::FLAT_ADDRESS),
        ("PO Number", &*patterns::PO_NUMBER),
    ]
}

/// Parser producing an ordered [`FlatInvoice`].
#[derive(Debug, Clone)]
pub struct KeyValueParser {
    max_key_chars: usize,
    max_value_chars: usize,
}

impl Default for KeyValueParser {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueParser {
    pub fn new() -> Self {
        Self {
            max_key_chars: DEFAULT_MAX_KEY_CHARS,
            max_value_chars: DEFAULT_MAX_VALUE_CHARS,
        }
    }

    /// Keys of this many characters or more are not recorded.
    pub fn with_max_key_chars(mut self, chars: usize) -> Self {
        self.max_key_chars = chars;
        self
    }

    /// Values of this many characters or more are not recorded.
    pub fn with_max_value_chars(mut self, chars: usize) -> Self {
        self.max_value_chars = chars;
        self
    }

    fn colon_pair<'t>(&self, line: &'t str) -> Option<(&'t str, &'t str)> {
        let caps = patterns::KEY_VALUE_LINE.captures(line)?;
        let key = caps.get(1)?.as_str().trim();
        let value = caps.get(2)?.as_str().trim();

        if key.is_empty() {
            return None;
        }
        if key.chars().count() >= self.max_key_chars
            || value.chars().count() >= self.max_value_chars
        {
            return None;
        }
        Some((key, value))
    }
}

impl InvoiceParser for KeyValueParser {
    type Output = FlatInvoice;

    fn parse(&self, text: &str) -> FlatInvoice {
        let mut fields = FlatInvoice::new();

        for (key, pattern) in field_table() {
            if let Some(value) = pattern.captures(text).and_then(|caps| caps.get(1)) {
                fields.insert_if_absent(key, value.as_str().trim());
            }
        }

        let labeled = fields.len();

        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            if let Some((key, value)) = self.colon_pair(line) {
                fields.insert_if_absent(key, value);
            }
        }

        debug!(
            "Flat parse: {} labeled fields, {} colon pairs",
            labeled,
            fields.len() - labeled
        );

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pairs(fields: &FlatInvoice) -> Vec<(&str, &str)> {
        fields.iter().collect()
    }

    #[test]
    fn test_labeled_fields_then_colon_lines() {
        let text = "Invoice #: 123\nVendor: Acme\nTerms: Net 30\nTotal: 100.00";
        let fields = KeyValueParser::new().parse(text);

        assert_eq!(
            pairs(&fields),
            vec![
                ("Invoice Number", "123"),
                ("Total Amount", "100.00"),
                ("Company Name", "Acme\nTerms"),
                ("Invoice #", "123"),
                ("Vendor", "Acme"),
                ("Terms", "Net 30"),
                ("Total", "100.00"),
            ]
        );
    }

    #[test]
    fn test_existing_key_is_not_overwritten() {
        let text = "Tax: 8.00\nTax: 9.99";
        let fields = KeyValueParser::new().parse(text);
        assert_eq!(fields.get("Tax"), Some("8.00"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_long_keys_and_values_are_ignored() {
        let long_key = "This line has a rather long lead in: yes";
        let long_value = format!("Note: {}", "x".repeat(120));
        let fields = KeyValueParser::new().parse(&format!("{}\n{}", long_key, long_value));

        assert!(fields.is_empty());
    }

    #[test]
    fn test_limits_are_configurable() {
        let parser = KeyValueParser::new().with_max_key_chars(5);
        let fields = parser.parse("Terms: Net 30\nRef: A1");
        assert_eq!(pairs(&fields), vec![("Ref", "A1")]);
    }

    #[test]
    fn test_address_and_contact() {
        let text = "Address: 12 Main St, Springfield\nPhone: (555) 010-2000\nEmail: billing@acme.test";
        let fields = KeyValueParser::new().parse(text);

        assert_eq!(fields.get("Address"), Some("12 Main St, Springfield\nPhone"));
        assert_eq!(fields.get("Phone"), Some("(555) 010-2000"));
        assert_eq!(fields.get("Email"), Some("billing@acme.test"));
    }

    #[test]
    fn test_labeled_values_run_across_lines() {
        let fields = KeyValueParser::new().parse("Bill To: Jane Doe\nAcme Corp\n");
        assert_eq!(fields.get("Customer Name"), Some("Jane Doe\nAcme Corp"));
        assert_eq!(fields.get("Bill To"), Some("Jane Doe"));

        let fields = KeyValueParser::new().parse("Phone: 555 010\n2233 x");
        assert_eq!(fields.get("Phone"), Some("555 010\n2233"));
    }

    #[test]
    fn test_blank_values_are_kept_empty() {
        let fields = KeyValueParser::new().parse("Customer: 12345\nNotes:   ");
        assert_eq!(fields.get("Customer Name"), Some(""));
        assert_eq!(fields.get("Notes"), Some(""));
        assert_eq!(fields.get("Customer"), Some("12345"));
    }

    #[test]
    fn test_empty_text() {
        assert!(KeyValueParser::new().parse("").is_empty());
        assert!(KeyValueParser::new().parse(" \n\n ").is_empty());
    }
}
