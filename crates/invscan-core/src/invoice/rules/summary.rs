//! Financial summary extraction (subtotal, discount, tax, total).

use regex::Regex;
use tracing::trace;

use super::{FieldExtractor, RuleSet};
use crate::models::invoice::{FinancialSummary, SummaryField};

/// A whole-text search rule for one labeled amount.
#[derive(Debug, Clone)]
pub struct SummaryRule {
    field: SummaryField,
    pattern: Regex,
    unless_after: Option<&'static str>,
}

impl SummaryRule {
    pub fn new(field: SummaryField, pattern: Regex, unless_after: Option<&'static str>) -> Self {
        Self {
            field,
            pattern,
            unless_after,
        }
    }

    pub fn field(&self) -> SummaryField {
        self.field
    }

    /// Whether the match starting at `start` is directly preceded by the
    /// excluded word (e.g. "Sub Total" or "Sub-Total" for the total rule).
    fn is_excluded(&self, text: &str, start: usize) -> bool {
        let Some(word) = self.unless_after else {
            return false;
        };
        let before = text[..start].trim_end_matches(|c: char| c.is_whitespace() || c == '-');
        let Some(tail_start) = before.len().checked_sub(word.len()) else {
            return false;
        };
        let Some(tail) = before.get(tail_start..) else {
            return false;
        };
        tail.eq_ignore_ascii_case(word)
            && !before[..tail_start]
                .chars()
                .next_back()
                .is_some_and(char::is_alphanumeric)
    }

    fn values<'t>(&'t self, text: &'t str) -> impl Iterator<Item = String> + 't {
        self.pattern.captures_iter(text).filter_map(move |caps| {
            let whole = caps.get(0)?;
            if self.is_excluded(text, whole.start()) {
                trace!("{} match at {} skipped", self.field.label(), whole.start());
                return None;
            }
            Some(caps.get(1)?.as_str().to_string())
        })
    }
}

impl FieldExtractor for SummaryRule {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        self.values(text).next()
    }
}

/// Apply every summary rule to the whole text; first match wins per field.
pub fn extract_summary(text: &str, rules: &RuleSet) -> FinancialSummary {
    let mut summary = FinancialSummary::default();

    for rule in rules.summary_rules() {
        if summary.get(rule.field()).is_some() {
            continue;
        }
        if let Some(value) = rule.extract(text) {
            summary.set(rule.field(), value);
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::rules::patterns;
    use pretty_assertions::assert_eq;

    fn extract(text: &str) -> FinancialSummary {
        extract_summary(text, &RuleSet::standard())
    }

    #[test]
    fn test_three_independent_fields() {
        let summary = extract("Subtotal: $100.00\nTax: $8.00\nTotal: $108.00");
        assert_eq!(
            summary,
            FinancialSummary {
                subtotal: Some("100.00".to_string()),
                discount: None,
                tax: Some("8.00".to_string()),
                total: Some("108.00".to_string()),
            }
        );
    }

    #[test]
    fn test_subtotal_line_is_not_a_total() {
        let summary = extract("Subtotal: 10.00\nTotal: 12.00");
        assert_eq!(summary.subtotal.as_deref(), Some("10.00"));
        assert_eq!(summary.total.as_deref(), Some("12.00"));
    }

    #[test]
    fn test_spaced_sub_total_is_not_a_total() {
        let summary = extract("Sub Total: 10.00\nGrand Total: 12.50");
        assert_eq!(summary.subtotal.as_deref(), Some("10.00"));
        assert_eq!(summary.total.as_deref(), Some("12.50"));
    }

    #[test]
    fn test_hyphenated_sub_total_is_not_a_total() {
        let summary = extract("Sub-Total: 100.00\nTotal: 108.00");
        assert_eq!(summary.subtotal.as_deref(), Some("100.00"));
        assert_eq!(summary.total.as_deref(), Some("108.00"));
    }

    #[test]
    fn test_badly_grouped_amount_is_kept_whole() {
        assert_eq!(extract("Total: 1,00").total.as_deref(), Some("1,00"));
    }

    #[test]
    fn test_only_sub_total_present() {
        let summary = extract("Sub Total: 10.00");
        assert_eq!(summary.subtotal.as_deref(), Some("10.00"));
        assert_eq!(summary.total, None);
    }

    #[test]
    fn test_commas_are_retained() {
        let summary = extract("Discount: 1,250.00\nAmount Due: $12,480.75");
        assert_eq!(summary.discount.as_deref(), Some("1,250.00"));
        assert_eq!(summary.total.as_deref(), Some("12,480.75"));
    }

    #[test]
    fn test_tax_label_variants() {
        assert_eq!(extract("VAT: 20.00").tax.as_deref(), Some("20.00"));
        assert_eq!(extract("GST 5").tax.as_deref(), Some("5"));
    }

    #[test]
    fn test_absent_is_not_zero() {
        assert_eq!(extract("nothing to see"), FinancialSummary::default());
    }

    #[test]
    fn test_exclusion_only_applies_to_sub() {
        let rule = SummaryRule::new(SummaryField::Total, patterns::TOTAL.clone(), Some("sub"));
        assert_eq!(rule.extract("Club Total: 4.00").as_deref(), Some("4.00"));
        assert_eq!(
            rule.extract("Sub Total: 1.00\nTotal: 2.00").as_deref(),
            Some("2.00")
        );
    }
}
