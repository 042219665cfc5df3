//! Rendering extracted invoices as JSON, text or CSV.

use serde::Serialize;

use invscan_core::models::config::OutputFormat as ConfigFormat;
use invscan_core::{format_currency, FlatInvoice, HeaderField, ParsedInvoice, SummaryField};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
    /// CSV output
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
            OutputFormat::Csv => "csv",
        }
    }
}

impl From<ConfigFormat> for OutputFormat {
    fn from(format: ConfigFormat) -> Self {
        match format {
            ConfigFormat::Json => OutputFormat::Json,
            ConfigFormat::Text => OutputFormat::Text,
            ConfigFormat::Csv => OutputFormat::Csv,
        }
    }
}

/// Output of either parser.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Extracted {
    Structured(ParsedInvoice),
    Flat(FlatInvoice),
}

impl Extracted {
    pub fn invoice_number(&self) -> Option<&str> {
        match self {
            Extracted::Structured(invoice) => invoice.get(HeaderField::InvoiceNumber),
            Extracted::Flat(fields) => fields.get("Invoice Number"),
        }
    }

    pub fn total(&self) -> Option<&str> {
        match self {
            Extracted::Structured(invoice) => invoice.summary.get(SummaryField::Total),
            Extracted::Flat(fields) => fields.get("Total Amount"),
        }
    }

    /// Number of line items; the flat parser does not produce any.
    pub fn line_item_count(&self) -> Option<usize> {
        match self {
            Extracted::Structured(invoice) => Some(invoice.line_items.len()),
            Extracted::Flat(_) => None,
        }
    }
}

pub fn render(extracted: &Extracted, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            if pretty {
                Ok(serde_json::to_string_pretty(extracted)?)
            } else {
                Ok(serde_json::to_string(extracted)?)
            }
        }
        OutputFormat::Text => Ok(match extracted {
            Extracted::Structured(invoice) => format_text(invoice),
            Extracted::Flat(fields) => format_flat_text(fields),
        }),
        OutputFormat::Csv => match extracted {
            Extracted::Structured(invoice) => format_csv(invoice),
            Extracted::Flat(fields) => format_flat_csv(fields),
        },
    }
}

fn format_text(invoice: &ParsedInvoice) -> String {
    if invoice.is_empty() {
        return "No invoice data found\n".to_string();
    }

    let mut output = String::new();

    if !invoice.line_items.is_empty() {
        output.push_str("Line Items\n");
        output.push_str(&format!(
            "{:<32} {:>8} {:>12} {:>12}\n",
            "Description", "Qty", "Unit Price", "Amount"
        ));
        output.push_str(&format!("{}\n", "-".repeat(67)));
        for item in &invoice.line_items {
            output.push_str(&format!(
                "{:<32} {:>8} {:>12} {:>12}\n",
                item.description,
                item.quantity.as_deref().unwrap_or("-"),
                format_currency(item.unit_price.as_deref()),
                format_currency(Some(item.amount.as_str())),
            ));
        }
        output.push('\n');
    }

    let summary = &invoice.summary;
    if !summary.is_empty() {
        for field in SummaryField::ALL {
            let Some(value) = summary.get(field) else {
                continue;
            };
            let shown = match field {
                SummaryField::Discount => format!("-{}", format_currency(Some(value))),
                _ => format_currency(Some(value)),
            };
            output.push_str(&format!("{:<10} {}\n", format!("{}:", field.label()), shown));
        }
        output.push('\n');
    }

    if !invoice.metadata.is_empty() {
        output.push_str("Extracted Information\n");
        for (field, value) in &invoice.metadata {
            output.push_str(&format!("  {}: {}\n", field.label(), value));
        }
    }

    output
}

fn format_flat_text(fields: &FlatInvoice) -> String {
    if fields.is_empty() {
        return "No invoice data found\n".to_string();
    }
    format!("{}\n", fields.to_clipboard_text())
}

fn format_csv(invoice: &ParsedInvoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["invoice_number", "description", "quantity", "unit_price", "amount"])?;

    let invoice_number = invoice.get(HeaderField::InvoiceNumber).unwrap_or_default();
    for item in &invoice.line_items {
        wtr.write_record([
            invoice_number,
            item.description.as_str(),
            item.quantity.as_deref().unwrap_or_default(),
            item.unit_price.as_deref().unwrap_or_default(),
            item.amount.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_flat_csv(fields: &FlatInvoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["key", "value"])?;
    for (key, value) in fields.iter() {
        wtr.write_record([key, value])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}
