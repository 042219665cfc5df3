//! Header field extraction (invoice number, dates, parties, contacts).

use std::collections::BTreeMap;

use regex::Regex;
use tracing::trace;

use super::{FieldExtractor, RuleSet};
use crate::models::invoice::HeaderField;

/// A whole-text search rule for one header field.
#[derive(Debug, Clone)]
pub struct HeaderRule {
    field: HeaderField,
    pattern: Regex,
}

impl HeaderRule {
    pub fn new(field: HeaderField, pattern: Regex) -> Self {
        Self { field, pattern }
    }

    pub fn field(&self) -> HeaderField {
        self.field
    }
}

impl FieldExtractor for HeaderRule {
    type Output = String;

    /// Trimmed capture of the first match. A capture of only whitespace
    /// yields an empty value, which is still a match.
    fn extract(&self, text: &str) -> Option<String> {
        let caps = self.pattern.captures(text)?;
        Some(caps.get(1)?.as_str().trim().to_string())
    }
}

/// Apply every header rule to the whole text.
///
/// Rules are independent; when several rules target the same field the
/// first registered rule that matches wins.
pub fn extract_header_fields(text: &str, rules: &RuleSet) -> BTreeMap<HeaderField, String> {
    let mut fields = BTreeMap::new();

    for rule in rules.header_rules() {
        if fields.contains_key(&rule.field()) {
            continue;
        }
        if let Some(value) = rule.extract(text) {
            trace!("header field {} = {:?}", rule.field(), value);
            fields.insert(rule.field(), value);
        }
    }

    fields
}
