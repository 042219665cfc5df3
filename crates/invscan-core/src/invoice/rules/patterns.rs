//! Common regex patterns for invoice text extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Lines containing any of these (lowercased) are never line items: they are
/// table headers or summary rows.
pub const SKIP_KEYWORDS: [&str; 7] = [
    "description",
    "item",
    "product",
    "subtotal",
    "total",
    "discount",
    "tax",
];

lazy_static! {
    // Header fields
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)invoice\s*(?:#|number|no\.?)?:?\s*([A-Z0-9-]+)"
    ).unwrap();

    pub static ref INVOICE_DATE: Regex = Regex::new(
        r"(?i)(?:invoice\s*)?date:?\s*([0-9/.-]+)"
    ).unwrap();

    pub static ref DUE_DATE: Regex = Regex::new(
        r"(?i)due\s*date:?\s*([0-9/.-]+)"
    ).unwrap();

    pub static ref CUSTOMER_NAME: Regex = Regex::new(
        r"(?i)(?:bill\s*to|customer|client):?\s*([A-Za-z \t]+)"
    ).unwrap();

    pub static ref COMPANY_NAME: Regex = Regex::new(
        r"(?i)(?:company|vendor|supplier):?\s*([A-Za-z \t&.]+)"
    ).unwrap();

    pub static ref EMAIL: Regex = Regex::new(
        r"([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})"
    ).unwrap();

    pub static ref PHONE: Regex = Regex::new(
        r"(?i)(?:phone|tel|mobile):?\s*([+0-9 \t()-]+)"
    ).unwrap();

    // "po" only as a whole word, otherwise "Report" or "Postal" would fire
    pub static ref PO_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:po|purchase\s*order)\b\s*(?:#|number|no\.?)?:?\s*([A-Z0-9-]+)"
    ).unwrap();

    // Financial summary (amount: digits with any commas kept, optional fraction)
    pub static ref SUBTOTAL: Regex = Regex::new(
        r"(?i)\bsub[\s-]*total:?\s*\$?\s*(\d[\d,]*(?:\.\d+)?)"
    ).unwrap();

    pub static ref DISCOUNT: Regex = Regex::new(
        r"(?i)\bdiscount:?\s*\$?\s*(\d[\d,]*(?:\.\d+)?)"
    ).unwrap();

    pub static ref TAX: Regex = Regex::new(
        r"(?i)\b(?:tax|vat|gst):?\s*\$?\s*(\d[\d,]*(?:\.\d+)?)"
    ).unwrap();

    pub static ref TOTAL: Regex = Regex::new(
        r"(?i)\b(?:grand\s*total|total|amount\s*due):?\s*\$?\s*(\d[\d,]*(?:\.\d+)?)"
    ).unwrap();

    // Line items
    pub static ref PRICE_TOKEN: Regex = Regex::new(
        r"\$?(\d+(?:,\d{3})*\.\d{2})"
    ).unwrap();

    pub static ref QUANTITY: Regex = Regex::new(
        r"\s(\d+)\s"
    ).unwrap();

    pub static ref DESCRIPTION: Regex = Regex::new(
        r"^([A-Za-z0-9\s,.'()-]+?)(?:\s+\d|\s*\$)"
    ).unwrap();

    pub static ref DIGIT_AFTER_SPACE: Regex = Regex::new(
        r"\s\d"
    ).unwrap();

    // Flat key/value parser
    pub static ref FLAT_TOTAL_AMOUNT: Regex = Regex::new(
        r"(?i)(?:total|amount|grand\s*total):?\s*\$?\s*([0-9,]+\.?\d*)"
    ).unwrap();

    pub static ref FLAT_SUBTOTAL: Regex = Regex::new(
        r"(?i)sub\s*total:?\s*\$?\s*([0-9,]+\.?\d*)"
    ).unwrap();

    pub static ref FLAT_TAX: Regex = Regex::new(
        r"(?i)(?:tax|vat|gst):?\s*\$?\s*([0-9,]+\.?\d*)"
    ).unwrap();

    // Values may run across line breaks here, unlike the header rules above
    pub static ref FLAT_CUSTOMER_NAME: Regex = Regex::new(
        r"(?i)(?:bill\s*to|customer|client):?\s*([A-Za-z\s]+)"
    ).unwrap();

    pub static ref FLAT_COMPANY_NAME: Regex = Regex::new(
        r"(?i)(?:company|vendor|supplier):?\s*([A-Za-z\s&.]+)"
    ).unwrap();

    pub static ref FLAT_PHONE: Regex = Regex::new(
        r"(?i)(?:phone|tel|mobile):?\s*([+0-9\s()-]+)"
    ).unwrap();

    pub static ref FLAT_ADDRESS: Regex = Regex::new(
        r"(?i)(?:address|location):?\s*([A-Za-z0-9\s,.-]+)"
    ).unwrap();

    pub static ref KEY_VALUE_LINE: Regex = Regex::new(
        r"^([^:]+):\s*(.+)$"
    ).unwrap();
}
