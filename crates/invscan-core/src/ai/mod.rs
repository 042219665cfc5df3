//! Remote AI invoice extraction.
//!
//! Sends the OCR text to an OpenAI-compatible chat completion endpoint with a
//! forced function tool call and decodes the tool arguments as an
//! [`AiInvoice`]. Callers decide whether to fall back to the rule-based
//! parser on failure.

mod error;
mod models;
mod protocol;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::models::config::AiConfig;

pub use error::{classify_status, AiError};
pub use models::{AiInvoice, AiLineItem};
pub use protocol::parse_completion;

use protocol::ChatRequest;

/// Client for the remote extraction endpoint.
#[derive(Debug, Clone)]
pub struct AiExtractor {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl AiExtractor {
    /// Create an extractor with an explicit API key.
    pub fn new(config: &AiConfig, api_key: impl Into<String>) -> Result<Self, AiError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AiError::MissingApiKey(config.api_key_env.clone()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// Create an extractor, reading the API key from `config.api_key_env`.
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| AiError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(config, api_key)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Extract an invoice from OCR text.
    pub async fn extract(&self, text: &str) -> Result<AiInvoice, AiError> {
        info!("Requesting AI extraction ({} chars, model {})", text.len(), self.model);

        let request = ChatRequest::for_text(&self.model, text);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("AI gateway error: {} {}", status.as_u16(), body);
            return Err(classify_status(status.as_u16(), body));
        }

        let invoice = parse_completion(&body)?;
        debug!("AI extraction returned {} line items", invoice.line_items.len());

        Ok(invoice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_var() {
        let config = AiConfig {
            api_key_env: "INVSCAN_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        match AiExtractor::from_config(&config) {
            Err(AiError::MissingApiKey(name)) => assert_eq!(name, "INVSCAN_TEST_KEY_THAT_IS_NEVER_SET"),
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_blank_key_rejected() {
        let result = AiExtractor::new(&AiConfig::default(), "  ");
        assert!(matches!(result, Err(AiError::MissingApiKey(_))));
    }

    #[test]
    fn test_explicit_key() {
        let config = AiConfig {
            model: "test-model".to_string(),
            ..Default::default()
        };
        let extractor = AiExtractor::new(&config, "secret").unwrap();
        assert_eq!(extractor.model(), "test-model");
        assert_eq!(extractor.endpoint(), AiConfig::default().endpoint);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let config = AiConfig {
            endpoint: "http://127.0.0.1:1/v1/chat/completions".to_string(),
            timeout_secs: 5,
            ..Default::default()
        };
        let extractor = AiExtractor::new(&config, "secret").unwrap();

        let err = extractor.extract("Total: 1.00").await.unwrap_err();
        assert!(matches!(err, AiError::Transport(_)));
        assert_eq!(err.code(), "EXTRACTION_ERROR");
    }
}
