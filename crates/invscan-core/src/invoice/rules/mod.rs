//! Rule-based field extractors for invoice OCR text.
//!
//! Every pattern the parsers use is registered as a [`Rule`] in a
//! [`RuleSet`]. Control flow never names a pattern directly, so a rule can be
//! tested on its own and a table can be extended without touching the
//! extractors.

pub mod amounts;
pub mod header;
pub mod line_items;
pub mod patterns;
pub mod summary;

pub use amounts::{format_currency, parse_amount};
pub use header::{extract_header_fields, HeaderRule};
pub use line_items::{classify_line, extract_line_items, price_tokens, LineClass};
pub use summary::{extract_summary, SummaryRule};

use regex::Regex;

use crate::models::config::ExtractionConfig;
use crate::models::invoice::{HeaderField, SummaryField};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// One registered extraction rule.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Whole-text search for a header field; capture group 1 is the value.
    Header { field: HeaderField, pattern: Regex },

    /// Whole-text search for a summary amount; capture group 1 is the value.
    /// Matches directly preceded by the word `unless_after` are ignored.
    Summary {
        field: SummaryField,
        pattern: Regex,
        unless_after: Option<&'static str>,
    },

    /// Lowercase keyword that marks a line as "not a line item".
    SkipKeyword(String),
}

/// Ordered rule tables used by the structured parser.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub(crate) header: Vec<HeaderRule>,
    pub(crate) summary: Vec<SummaryRule>,
    pub(crate) skip_keywords: Vec<String>,
    pub(crate) min_description_chars: usize,
}

impl RuleSet {
    /// Start an empty rule set.
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::new()
    }

    /// The built-in rule tables.
    pub fn standard() -> Self {
        Self::standard_builder().build()
    }

    /// Builder preloaded with the built-in rules, for extension.
    pub fn standard_builder() -> RuleSetBuilder {
        let mut builder = RuleSet::builder()
            .header(HeaderField::InvoiceNumber, patterns::INVOICE_NUMBER.clone())
            .header(HeaderField::InvoiceDate, patterns::INVOICE_DATE.clone())
            .header(HeaderField::DueDate, patterns::DUE_DATE.clone())
            .header(HeaderField::CustomerName, patterns::CUSTOMER_NAME.clone())
            .header(HeaderField::CompanyName, patterns::COMPANY_NAME.clone())
            .header(HeaderField::Email, patterns::EMAIL.clone())
            .header(HeaderField::Phone, patterns::PHONE.clone())
            .header(HeaderField::PoNumber, patterns::PO_NUMBER.clone())
            .summary(SummaryField::Subtotal, patterns::SUBTOTAL.clone())
            .summary(SummaryField::Discount, patterns::DISCOUNT.clone())
            .summary(SummaryField::Tax, patterns::TAX.clone())
            .rule(Rule::Summary {
                field: SummaryField::Total,
                pattern: patterns::TOTAL.clone(),
                unless_after: Some("sub"),
            });

        for keyword in patterns::SKIP_KEYWORDS {
            builder = builder.skip_keyword(keyword);
        }
        builder
    }

    /// Built-in rules adjusted by an extraction config.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        let mut builder =
            Self::standard_builder().min_description_chars(config.min_description_chars);
        for keyword in &config.extra_skip_keywords {
            builder = builder.skip_keyword(keyword);
        }
        builder.build()
    }

    pub fn header_rules(&self) -> &[HeaderRule] {
        &self.header
    }

    pub fn summary_rules(&self) -> &[SummaryRule] {
        &self.summary
    }

    pub fn skip_keywords(&self) -> &[String] {
        &self.skip_keywords
    }

    pub fn min_description_chars(&self) -> usize {
        self.min_description_chars
    }

    /// First skip keyword contained in the (lowercased) line.
    pub fn skip_keyword_in(&self, line: &str) -> Option<&str> {
        let lower = line.to_lowercase();
        self.skip_keywords
            .iter()
            .find(|k| lower.contains(k.as_str()))
            .map(String::as_str)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Registration-style builder for [`RuleSet`].
#[derive(Debug, Clone)]
pub struct RuleSetBuilder {
    rules: Vec<Rule>,
    min_description_chars: usize,
}

impl RuleSetBuilder {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            min_description_chars: 3,
        }
    }

    /// Register a rule. Rules keep their registration order.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn header(self, field: HeaderField, pattern: Regex) -> Self {
        self.rule(Rule::Header { field, pattern })
    }

    pub fn summary(self, field: SummaryField, pattern: Regex) -> Self {
        self.rule(Rule::Summary {
            field,
            pattern,
            unless_after: None,
        })
    }

    pub fn skip_keyword(self, keyword: impl AsRef<str>) -> Self {
        self.rule(Rule::SkipKeyword(keyword.as_ref().to_lowercase()))
    }

    /// Set the minimum description length for line items.
    pub fn min_description_chars(mut self, chars: usize) -> Self {
        self.min_description_chars = chars;
        self
    }

    pub fn build(self) -> RuleSet {
        let mut set = RuleSet {
            header: Vec::new(),
            summary: Vec::new(),
            skip_keywords: Vec::new(),
            min_description_chars: self.min_description_chars,
        };

        for rule in self.rules {
            match rule {
                Rule::Header { field, pattern } => set.header.push(HeaderRule::new(field, pattern)),
                Rule::Summary {
                    field,
                    pattern,
                    unless_after,
                } => set.summary.push(SummaryRule::new(field, pattern, unless_after)),
                Rule::SkipKeyword(keyword) => {
                    if !keyword.is_empty() && !set.skip_keywords.contains(&keyword) {
                        set.skip_keywords.push(keyword);
                    }
                }
            }
        }

        set
    }
}

impl Default for RuleSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tables() {
        let rules = RuleSet::standard();
        let fields: Vec<HeaderField> = rules.header_rules().iter().map(|r| r.field()).collect();
        assert_eq!(fields, HeaderField::ALL.to_vec());
        assert_eq!(rules.summary_rules().len(), 4);
        assert_eq!(rules.skip_keywords().len(), patterns::SKIP_KEYWORDS.len());
        assert_eq!(rules.min_description_chars(), 3);
    }

    #[test]
    fn test_skip_keyword_is_case_insensitive() {
        let rules = RuleSet::standard();
        assert_eq!(rules.skip_keyword_in("GRAND TOTAL"), Some("total"));
        assert_eq!(rules.skip_keyword_in("Widget 3 $10.00"), None);
    }

    #[test]
    fn test_config_extends_skip_keywords() {
        let config = ExtractionConfig {
            extra_skip_keywords: vec!["Shipping".to_string(), "tax".to_string()],
            min_description_chars: 5,
            ..Default::default()
        };
        let rules = RuleSet::from_config(&config);

        assert_eq!(rules.skip_keyword_in("shipping 5.00"), Some("shipping"));
        assert_eq!(rules.skip_keywords().len(), patterns::SKIP_KEYWORDS.len() + 1);
        assert_eq!(rules.min_description_chars(), 5);
    }

    #[test]
    fn test_builder_keeps_registration_order() {
        let rules = RuleSet::builder()
            .header(HeaderField::Email, patterns::EMAIL.clone())
            .header(HeaderField::InvoiceNumber, patterns::INVOICE_NUMBER.clone())
            .build();
        let fields: Vec<HeaderField> = rules.header_rules().iter().map(|r| r.field()).collect();
        assert_eq!(fields, vec![HeaderField::Email, HeaderField::InvoiceNumber]);
        assert!(rules.skip_keywords().is_empty());
    }
}
