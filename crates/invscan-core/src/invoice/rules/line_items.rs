//! Line item extraction from tabular invoice text.
//!
//! Every non-blank line is classified on its own; the only cross-line effect
//! is that accepted items keep their source order.

use tracing::trace;

use super::patterns::{DESCRIPTION, DIGIT_AFTER_SPACE, PRICE_TOKEN, QUANTITY};
use super::RuleSet;
use crate::models::invoice::LineItem;

/// Outcome of classifying one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'r> {
    /// Table header or summary row (contains a skip keyword).
    Skipped { keyword: &'r str },
    /// No price-shaped token on the line.
    NoPrice,
    /// Prices found, but the description is too short.
    Rejected { description: String },
    /// An accepted line item.
    Item(LineItem),
}

/// Price-shaped tokens on a line, left to right, without the `$` sign.
pub fn price_tokens(line: &str) -> Vec<&str> {
    PRICE_TOKEN
        .captures_iter(line)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Leading text up to the first whitespace-preceded number or `$`.
fn extract_description(line: &str) -> String {
    if let Some(caps) = DESCRIPTION.captures(line) {
        return caps[1].trim().to_string();
    }
    DIGIT_AFTER_SPACE
        .split(line)
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// First whitespace-delimited bare integer.
fn extract_quantity(line: &str) -> Option<String> {
    QUANTITY.captures(line).map(|caps| caps[1].to_string())
}

/// Classify a single line.
///
/// With two or more prices the last one is the amount and the one before it
/// the unit price; any earlier prices are ignored.
pub fn classify_line<'r>(line: &str, rules: &'r RuleSet) -> LineClass<'r> {
    let line = line.trim();

    if let Some(keyword) = rules.skip_keyword_in(line) {
        return LineClass::Skipped { keyword };
    }

    let prices = price_tokens(line);
    let Some((amount, earlier)) = prices.split_last() else {
        return LineClass::NoPrice;
    };

    let description = extract_description(line);
    if description.chars().count() < rules.min_description_chars() || amount.is_empty() {
        return LineClass::Rejected { description };
    }

    LineClass::Item(LineItem {
        description,
        quantity: extract_quantity(line),
        unit_price: earlier.last().map(|p| p.to_string()),
        amount: amount.to_string(),
    })
}

/// Extract line items from the whole text, in source order.
pub fn extract_line_items(text: &str, rules: &RuleSet) -> Vec<LineItem> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match classify_line(line, rules) {
            LineClass::Item(item) => Some(item),
            other => {
                trace!("line {:?} not an item: {:?}", line, other);
                None
            }
        })
        .collect()
}
