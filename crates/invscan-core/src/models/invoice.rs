//! Invoice data models produced by the extraction parsers.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A structured invoice extracted from one OCR run.
///
/// Optional values keep the difference between "not found" (`None`) and
/// "found but empty" (`Some(String::new())`); renderers rely on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedInvoice {
    /// Header fields, at most one value per field.
    pub metadata: BTreeMap<HeaderField, String>,

    /// Line items in source order.
    pub line_items: Vec<LineItem>,

    /// Subtotal, discount, tax and total.
    #[serde(flatten)]
    pub summary: FinancialSummary,
}

impl ParsedInvoice {
    /// Value of a header field, if it was found.
    pub fn get(&self, field: HeaderField) -> Option<&str> {
        self.metadata.get(&field).map(String::as_str)
    }

    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty() && self.line_items.is_empty() && self.summary.is_empty()
    }

    /// Header fields as `key: value` lines, in vocabulary order.
    pub fn to_clipboard_text(&self) -> String {
        self.metadata
            .iter()
            .map(|(field, value)| format!("{}: {}", field, value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Fixed vocabulary of invoice header fields.
///
/// Declaration order is the rule order and the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeaderField {
    #[serde(rename = "Invoice Number")]
    InvoiceNumber,
    #[serde(rename = "Invoice Date")]
    InvoiceDate,
    #[serde(rename = "Due Date")]
    DueDate,
    #[serde(rename = "Customer Name")]
    CustomerName,
    #[serde(rename = "Company Name")]
    CompanyName,
    #[serde(rename = "Email")]
    Email,
    #[serde(rename = "Phone")]
    Phone,
    #[serde(rename = "PO Number")]
    PoNumber,
}

impl HeaderField {
    /// All fields in rule order.
    pub const ALL: [HeaderField; 8] = [
        HeaderField::InvoiceNumber,
        HeaderField::InvoiceDate,
        HeaderField::DueDate,
        HeaderField::CustomerName,
        HeaderField::CompanyName,
        HeaderField::Email,
        HeaderField::Phone,
        HeaderField::PoNumber,
    ];

    /// Human-readable label, also used as the serialized key.
    pub fn label(&self) -> &'static str {
        match self {
            HeaderField::InvoiceNumber => "Invoice Number",
            HeaderField::InvoiceDate => "Invoice Date",
            HeaderField::DueDate => "Due Date",
            HeaderField::CustomerName => "Customer Name",
            HeaderField::CompanyName => "Company Name",
            HeaderField::Email => "Email",
            HeaderField::Phone => "Phone",
            HeaderField::PoNumber => "PO Number",
        }
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single purchased good or service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Trimmed description, always longer than two characters.
    pub description: String,

    /// Quantity as it appeared in the text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,

    /// Unit price; only set when the line carried two or more prices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<String>,

    /// Extended amount for the line.
    pub amount: String,
}

/// Labels of the financial summary block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryField {
    Subtotal,
    Discount,
    Tax,
    Total,
}

impl SummaryField {
    pub const ALL: [SummaryField; 4] = [
        SummaryField::Subtotal,
        SummaryField::Discount,
        SummaryField::Tax,
        SummaryField::Total,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SummaryField::Subtotal => "Subtotal",
            SummaryField::Discount => "Discount",
            SummaryField::Tax => "Tax",
            SummaryField::Total => "Total",
        }
    }
}

/// Financial totals as matched in the text (commas retained, never computed).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
}

impl FinancialSummary {
    pub fn get(&self, field: SummaryField) -> Option<&str> {
        match field {
            SummaryField::Subtotal => self.subtotal.as_deref(),
            SummaryField::Discount => self.discount.as_deref(),
            SummaryField::Tax => self.tax.as_deref(),
            SummaryField::Total => self.total.as_deref(),
        }
    }

    pub fn set(&mut self, field: SummaryField, value: String) {
        let slot = match field {
            SummaryField::Subtotal => &mut self.subtotal,
            SummaryField::Discount => &mut self.discount,
            SummaryField::Tax => &mut self.tax,
            SummaryField::Total => &mut self.total,
        };
        *slot = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        SummaryField::ALL.iter().all(|f| self.get(*f).is_none())
    }
}

/// Ordered key/value dump produced by the flat parser.
///
/// Keys are unique; the first value recorded for a key is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatInvoice {
    fields: Vec<(String, String)>,
}

impl FlatInvoice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key -> value` unless the key is already present.
    ///
    /// Returns whether the pair was added.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.fields.push((key, value.into()));
        true
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pairs as `key: value` lines, in insertion order.
    pub fn to_clipboard_text(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Serialize for FlatInvoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> ParsedInvoice {
        let mut invoice = ParsedInvoice::default();
        invoice
            .metadata
            .insert(HeaderField::PoNumber, "PO-77".to_string());
        invoice
            .metadata
            .insert(HeaderField::InvoiceNumber, "INV-1".to_string());
        invoice.line_items.push(LineItem {
            description: "Consulting fee".to_string(),
            quantity: None,
            unit_price: None,
            amount: "500.00".to_string(),
        });
        invoice.summary.total = Some("500.00".to_string());
        invoice
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "metadata": { "Invoice Number": "INV-1", "PO Number": "PO-77" },
                "lineItems": [{ "description": "Consulting fee", "amount": "500.00" }],
                "total": "500.00"
            })
        );
    }

    #[test]
    fn test_absent_and_empty_are_distinct() {
        let mut item = sample().line_items.remove(0);
        item.unit_price = Some(String::new());
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["unitPrice"], json!(""));
        assert!(value.get("quantity").is_none());
    }

    #[test]
    fn test_deserialize_round_trip() {
        let invoice = sample();
        let text = serde_json::to_string(&invoice).unwrap();
        let back: ParsedInvoice = serde_json::from_str(&text).unwrap();
        assert_eq!(back, invoice);
    }

    #[test]
    fn test_clipboard_text_follows_vocabulary_order() {
        assert_eq!(
            sample().to_clipboard_text(),
            "Invoice Number: INV-1\nPO Number: PO-77"
        );
    }

    #[test]
    fn test_summary_get_set() {
        let mut summary = FinancialSummary::default();
        assert!(summary.is_empty());
        summary.set(SummaryField::Tax, "8.00".to_string());
        assert_eq!(summary.get(SummaryField::Tax), Some("8.00"));
        assert_eq!(summary.get(SummaryField::Total), None);
        assert!(!summary.is_empty());
    }

    #[test]
    fn test_flat_invoice_keeps_first_value_and_order() {
        let mut flat = FlatInvoice::new();
        assert!(flat.insert_if_absent("Vendor", "Acme"));
        assert!(flat.insert_if_absent("Terms", "Net 30"));
        assert!(!flat.insert_if_absent("Vendor", "Other"));

        assert_eq!(flat.get("Vendor"), Some("Acme"));
        assert_eq!(flat.len(), 2);
        assert_eq!(
            serde_json::to_string(&flat).unwrap(),
            r#"{"Vendor":"Acme","Terms":"Net 30"}"#
        );
        assert_eq!(flat.to_clipboard_text(), "Vendor: Acme\nTerms: Net 30");
    }
}
