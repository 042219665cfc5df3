//! Configuration structures for the extraction pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// Main configuration for invscan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Rule-based extraction configuration.
    pub extraction: ExtractionConfig,

    /// Remote AI extraction configuration.
    pub ai: AiConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Which rule-based parser to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserKind {
    /// Header fields, line items and financial summary.
    #[default]
    Structured,
    /// Labeled fields plus every `key: value` line.
    Flat,
}

/// Rule-based extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum number of characters in a line item description.
    pub min_description_chars: usize,

    /// Keywords that mark a line as "not a line item", in addition to the
    /// built-in table header and summary labels.
    pub extra_skip_keywords: Vec<String>,

    /// Parser used when no AI extraction happens.
    pub parser: ParserKind,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_description_chars: 3,
            extra_skip_keywords: Vec::new(),
            parser: ParserKind::Structured,
        }
    }
}

/// Remote AI extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Try the AI extractor before the rule-based parser.
    pub enabled: bool,

    /// OpenAI-compatible chat completions endpoint.
    pub endpoint: String,

    /// Model identifier sent with each request.
    pub model: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Fall back to the rule-based parser when the AI call fails.
    pub fallback_to_rules: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://ai.gateway.lovable.dev/v1/chat/completions".to_string(),
            model: "google/gemini-2.5-flash".to_string(),
            api_key_env: "LOVABLE_API_KEY".to_string(),
            timeout_secs: 60,
            fallback_to_rules: true,
        }
    }
}

/// Output format for extracted invoices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
    Csv,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format.
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            pretty: true,
        }
    }
}

impl ScanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values no parser run could make sense of.
    pub fn validate(&self) -> Result<()> {
        if self.extraction.min_description_chars == 0 {
            return Err(ScanError::Config(
                "extraction.min_description_chars must be at least 1".to_string(),
            ));
        }
        if self.ai.enabled && self.ai.endpoint.trim().is_empty() {
            return Err(ScanError::Config("ai.endpoint is empty".to_string()));
        }
        if self.ai.timeout_secs == 0 {
            return Err(ScanError::Config("ai.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: ScanConfig =
            serde_json::from_str(r#"{ "ai": { "enabled": true, "model": "m" } }"#).unwrap();

        assert!(config.ai.enabled);
        assert_eq!(config.ai.model, "m");
        assert_eq!(config.ai.api_key_env, "LOVABLE_API_KEY");
        assert_eq!(config.extraction, ExtractionConfig::default());
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_enum_spelling() {
        let config: ScanConfig = serde_json::from_str(
            r#"{ "extraction": { "parser": "flat" }, "output": { "format": "csv" } }"#,
        )
        .unwrap();
        assert_eq!(config.extraction.parser, ParserKind::Flat);
        assert_eq!(config.output.format, OutputFormat::Csv);
    }

    #[test]
    fn test_validate_rejects_zero_description_chars() {
        let mut config = ScanConfig::default();
        config.extraction.min_description_chars = 0;
        assert!(matches!(config.validate(), Err(ScanError::Config(_))));
        assert!(ScanConfig::default().validate().is_ok());
    }
}
