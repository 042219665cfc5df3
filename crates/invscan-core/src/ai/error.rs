//! Errors and status mapping for the remote extractor.

use thiserror::Error;

/// Errors from the remote extraction path.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("{0} is not configured")]
    MissingApiKey(String),

    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited,

    #[error("AI credits exhausted. Please add credits to continue.")]
    PaymentRequired,

    #[error("AI gateway error: {status}")]
    Gateway { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("No tool call in AI response")]
    NoToolCall,

    #[error("invalid extraction payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("AI gateway reported: {0}")]
    Remote(String),
}

impl AiError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            AiError::RateLimited => "RATE_LIMIT",
            AiError::PaymentRequired => "PAYMENT_REQUIRED",
            _ => "EXTRACTION_ERROR",
        }
    }

    /// Whether retrying the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AiError::RateLimited => true,
            AiError::Transport(e) => e.is_timeout() || e.is_connect(),
            AiError::Gateway { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Map a non-success HTTP status to an error.
pub fn classify_status(status: u16, body: impl Into<String>) -> AiError {
    match status {
        429 => AiError::RateLimited,
        402 => AiError::PaymentRequired,
        _ => AiError::Gateway {
            status,
            body: body.into(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        assert!(matches!(classify_status(429, ""), AiError::RateLimited));
        assert!(matches!(classify_status(402, ""), AiError::PaymentRequired));
        match classify_status(503, "upstream down") {
            AiError::Gateway { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "upstream down");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_codes() {
        assert_eq!(AiError::RateLimited.code(), "RATE_LIMIT");
        assert_eq!(AiError::PaymentRequired.code(), "PAYMENT_REQUIRED");
        assert_eq!(AiError::NoToolCall.code(), "EXTRACTION_ERROR");
        assert_eq!(AiError::MissingApiKey("KEY".into()).code(), "EXTRACTION_ERROR");
    }

    #[test]
    fn test_retryable() {
        assert!(AiError::RateLimited.is_retryable());
        assert!(classify_status(502, "").is_retryable());
        assert!(!AiError::PaymentRequired.is_retryable());
        assert!(!classify_status(400, "").is_retryable());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            AiError::MissingApiKey("LOVABLE_API_KEY".into()).to_string(),
            "LOVABLE_API_KEY is not configured"
        );
        assert_eq!(AiError::NoToolCall.to_string(), "No tool call in AI response");
    }
}
