//! Core library for invoice OCR text processing.
//!
//! This crate provides:
//! - Rule-based invoice extraction from raw OCR text (header fields, line
//!   items, financial summary)
//! - A flat key/value parser for quick labeled-field dumps
//! - Amount parsing and currency formatting helpers
//! - An optional remote AI extraction client (`ai` feature)

pub mod error;
pub mod models;
pub mod invoice;

#[cfg(feature = "ai")]
pub mod ai;

pub use error::{Result, ScanError};
pub use invoice::rules::{format_currency, parse_amount};
pub use invoice::{
    ExtractionResult, ExtractionSource, InvoiceParser, KeyValueParser, RegexInvoiceParser,
};
pub use models::config::ScanConfig;
pub use models::invoice::{
    FinancialSummary, FlatInvoice, HeaderField, LineItem, ParsedInvoice, SummaryField,
};

#[cfg(feature = "ai")]
pub use ai::{AiError, AiExtractor, AiInvoice};
