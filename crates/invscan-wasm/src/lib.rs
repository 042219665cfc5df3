//! WASM bindings for invoice OCR text extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! OCR itself runs on the JavaScript side; these functions take its text.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use invscan_core::invoice::{InvoiceParser, KeyValueParser, RegexInvoiceParser};
use invscan_core::models::config::ExtractionConfig;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Serialize maps as plain objects rather than `Map`.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract a structured invoice from OCR text.
#[wasm_bindgen]
pub fn parse_invoice_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&RegexInvoiceParser::new().parse(text))
}

/// Extract labeled fields and `key: value` lines from OCR text.
#[wasm_bindgen]
pub fn parse_key_values(text: &str) -> Result<JsValue, JsValue> {
    to_js(&KeyValueParser::new().parse(text))
}

/// Format an amount for display (`$1234.50`), `-` when absent.
#[wasm_bindgen]
pub fn format_currency(value: Option<String>) -> String {
    invscan_core::format_currency(value.as_deref())
}

/// Parse an amount such as `$1,234.50`.
#[wasm_bindgen]
pub fn parse_amount(amount: &str) -> Option<f64> {
    invscan_core::parse_amount(amount).and_then(|d| d.to_string().parse().ok())
}

/// Configurable invoice scanner for browser use.
#[wasm_bindgen]
pub struct InvoiceScanner {
    config: ExtractionConfig,
    parser: RegexInvoiceParser,
}

#[wasm_bindgen]
impl InvoiceScanner {
    /// Create a scanner with the built-in rules.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let config = ExtractionConfig::default();
        let parser = RegexInvoiceParser::from_config(&config);
        Self { config, parser }
    }

    /// Minimum description length for line items.
    #[wasm_bindgen]
    pub fn set_min_description_chars(&mut self, chars: usize) {
        self.config.min_description_chars = chars.max(1);
        self.rebuild();
    }

    /// Treat lines containing `keyword` as non-items.
    #[wasm_bindgen]
    pub fn add_skip_keyword(&mut self, keyword: &str) {
        self.config.extra_skip_keywords.push(keyword.to_string());
        self.rebuild();
    }

    /// Extract a structured invoice.
    #[wasm_bindgen]
    pub fn parse(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse(text))
    }

    /// Extract with warnings and timing.
    #[wasm_bindgen]
    pub fn parse_with_report(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse_with_report(text))
    }

    /// Header fields as `key: value` lines for copying.
    #[wasm_bindgen]
    pub fn clipboard_text(&self, text: &str) -> String {
        self.parser.parse(text).to_clipboard_text()
    }
}

impl InvoiceScanner {
    fn rebuild(&mut self) {
        self.parser = RegexInvoiceParser::from_config(&self.config);
    }
}

impl Default for InvoiceScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_format_currency() {
        assert_eq!(format_currency(Some("1,234.5".to_string())), "$1234.50");
        assert_eq!(format_currency(None), "-");
    }

    #[wasm_bindgen_test]
    fn test_parse_amount() {
        let amount = parse_amount("$1,234.56").unwrap();
        assert!((amount - 1234.56).abs() < 0.001);
        assert_eq!(parse_amount("n/a"), None);
    }

    #[wasm_bindgen_test]
    fn test_scanner_clipboard_text() {
        let scanner = InvoiceScanner::new();
        assert_eq!(
            scanner.clipboard_text("Invoice #: A-1\nBill To: Jane Doe"),
            "Invoice Number: A-1\nCustomer Name: Jane Doe"
        );
    }

    #[wasm_bindgen_test]
    fn test_scanner_skip_keyword() {
        let mut scanner = InvoiceScanner::new();
        assert_eq!(scanner.parser.parse("Shipping fee $5.00").line_items.len(), 1);

        scanner.add_skip_keyword("Shipping");
        assert!(scanner.parser.parse("Shipping fee $5.00").line_items.is_empty());
    }

    #[wasm_bindgen_test]
    fn test_parse_invoice_text() {
        let value = parse_invoice_text("Widget 3 $10.00 $30.00").unwrap();
        assert!(value.is_object());
    }
}
