use thiserror::Error;

/// Errors that can occur while talking to a model provider.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Failed to connect to the provider
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Provider answered with a non-success status
    #[error("{status} {body}")]
    Api { status: u16, body: String },

    #[error("Rate limited{}", retry_hint(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },

    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Missing API key for {0}")]
    MissingApiKey(&'static str),
}

fn retry_hint(retry_after_secs: &Option<u64>) -> String {
    retry_after_secs
        .map(|s| format!(" (retry after {}s)", s))
        .unwrap_or_default()
}

impl LlmError {
    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Connection(_) | LlmError::Timeout(_) | LlmError::RateLimited { .. } => true,
            LlmError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(timeout_secs)
        } else if err.is_decode() {
            LlmError::Parse(err.to_string())
        } else {
            LlmError::Connection(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = LlmError::Api {
            status: 401,
            body: "invalid key".to_string(),
        };
        assert_eq!(err.to_string(), "401 invalid key");
    }

    #[test]
    fn test_rate_limited_display() {
        let err = LlmError::RateLimited {
            retry_after_secs: Some(5),
        };
        assert_eq!(err.to_string(), "Rate limited (retry after 5s)");
        let err = LlmError::RateLimited {
            retry_after_secs: None,
        };
        assert_eq!(err.to_string(), "Rate limited");
    }

    #[test]
    fn test_transient_classification() {
        assert!(LlmError::Timeout(60).is_transient());
        assert!(LlmError::Connection("refused".into()).is_transient());
        assert!(LlmError::Api {
            status: 503,
            body: String::new()
        }
        .is_transient());
        assert!(!LlmError::Api {
            status: 400,
            body: String::new()
        }
        .is_transient());
        assert!(!LlmError::EmptyResponse.is_transient());
    }
}
