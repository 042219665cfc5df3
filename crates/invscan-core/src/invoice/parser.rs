//! Rule-based invoice parser producing structured invoices.

use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::invoice::{HeaderField, ParsedInvoice, SummaryField};

use super::rules::{extract_header_fields, extract_line_items, extract_summary, RuleSet};
use super::InvoiceParser;

/// Which extraction path produced an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    /// The regex rule tables.
    Rules,
    /// The remote AI extractor.
    Ai,
}

/// Result of invoice extraction with diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Extracted invoice data.
    pub invoice: ParsedInvoice,
    /// Extraction path that produced `invoice`.
    pub source: ExtractionSource,
    /// Raw input text.
    pub raw_text: String,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Wrap an invoice, deriving warnings from what is missing.
    pub fn new(
        invoice: ParsedInvoice,
        source: ExtractionSource,
        raw_text: impl Into<String>,
        processing_time_ms: u64,
    ) -> Self {
        let warnings = missing_field_warnings(&invoice);
        Self {
            invoice,
            source,
            raw_text: raw_text.into(),
            warnings,
            processing_time_ms,
        }
    }
}

fn missing_field_warnings(invoice: &ParsedInvoice) -> Vec<String> {
    let mut warnings = Vec::new();

    if invoice.get(HeaderField::InvoiceNumber).is_none() {
        warnings.push("Could not extract invoice number".to_string());
    }
    if invoice.line_items.is_empty() {
        warnings.push("Could not extract line items".to_string());
    }
    if invoice.summary.get(SummaryField::Total).is_none() {
        warnings.push("Could not extract total".to_string());
    }

    warnings
}

/// Regex-based invoice parser.
///
/// Header fields, the financial summary and line items are extracted
/// independently from the same text and assembled into one record.
#[derive(Debug, Clone, Default)]
pub struct RegexInvoiceParser {
    rules: RuleSet,
}

impl RegexInvoiceParser {
    /// Create a parser with the built-in rules.
    pub fn new() -> Self {
        Self {
            rules: RuleSet::standard(),
        }
    }

    /// Create a parser with a custom rule set.
    pub fn with_rules(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Create a parser from an extraction config.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            rules: RuleSet::from_config(config),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Parse and attach warnings and timing.
    pub fn parse_with_report(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let invoice = self.parse(text);
        ExtractionResult::new(
            invoice,
            ExtractionSource::Rules,
            text,
            start.elapsed().as_millis() as u64,
        )
    }
}

impl InvoiceParser for RegexInvoiceParser {
    type Output = ParsedInvoice;

    fn parse(&self, text: &str) -> ParsedInvoice {
        let metadata = extract_header_fields(text, &self.rules);
        let summary = extract_summary(text, &self.rules);
        let line_items = extract_line_items(text, &self.rules);

        debug!(
            "Parsed {} chars: {} header fields, {} line items",
            text.len(),
            metadata.len(),
            line_items.len()
        );

        ParsedInvoice {
            metadata,
            line_items,
            summary,
        }
    }
}
