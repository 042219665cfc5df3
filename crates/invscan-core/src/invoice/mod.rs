//! Invoice field extraction module.

mod flat;
mod parser;
pub mod rules;

pub use flat::KeyValueParser;
pub use parser::{ExtractionResult, ExtractionSource, RegexInvoiceParser};

/// Trait for invoice text parsers.
///
/// Parsing is total: every input, including empty or garbled text, yields a
/// value, and parsing the same text twice yields equal values.
pub trait InvoiceParser {
    /// The record this parser produces.
    type Output;

    /// Parse invoice data from raw OCR text.
    fn parse(&self, text: &str) -> Self::Output;
}
