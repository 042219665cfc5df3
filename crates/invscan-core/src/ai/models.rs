//! Invoice shape returned by the remote extractor.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::invoice::{FinancialSummary, HeaderField, LineItem, ParsedInvoice};

/// Structured invoice as returned through the extraction tool call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiInvoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    /// YYYY-MM-DD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,
    /// HH:MM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub line_items: Vec<AiLineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,
    pub total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One line item from the remote extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiLineItem {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

impl From<&AiLineItem> for LineItem {
    fn from(item: &AiLineItem) -> Self {
        LineItem {
            description: item.description.trim().to_string(),
            quantity: item.quantity.map(|q| q.normalize().to_string()),
            unit_price: item.unit_price.map(money),
            amount: money(item.amount),
        }
    }
}

impl From<&AiInvoice> for ParsedInvoice {
    fn from(ai: &AiInvoice) -> Self {
        let mut invoice = ParsedInvoice::default();

        let header = [
            (HeaderField::InvoiceNumber, &ai.invoice_number),
            (HeaderField::InvoiceDate, &ai.invoice_date),
            (HeaderField::DueDate, &ai.due_date),
            (HeaderField::CustomerName, &ai.customer_name),
            (HeaderField::CompanyName, &ai.vendor_name),
        ];
        for (field, value) in header {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                invoice.metadata.insert(field, value.to_string());
            }
        }

        invoice.line_items = ai.line_items.iter().map(LineItem::from).collect();
        invoice.summary = FinancialSummary {
            subtotal: ai.subtotal.map(money),
            discount: ai.discount.map(money),
            tax: ai.tax.map(money),
            total: Some(money(ai.total)),
        };

        invoice
    }
}
