//! Model clients for hosted LLM providers.
//!
//! Gemini and Groq sit behind the same [`ModelClient`] trait. A session
//! picks one provider up front and keeps it; there is no fallback chain.

mod config;
mod error;
mod gemini;
mod groq;
pub mod retry;

use async_trait::async_trait;
use reqwest::Response;
use tracing::{debug, warn};

use crate::config::ApiKeys;

pub use config::{LlmConfig, LlmProvider};
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use groq::GroqClient;

/// A provider that turns a prompt into generated text.
#[async_trait]
pub trait ModelClient: Send + Sync {
    fn provider(&self) -> LlmProvider;

    /// Model name sent with each request.
    fn model(&self) -> &str;

    async fn generate_response(&self, prompt: &str) -> Result<String, LlmError>;

    /// Models the provider reports as available to this key.
    async fn list_models(&self) -> Result<Vec<String>, LlmError>;
}

/// Construct the client for `provider`.
pub fn build_client(
    provider: LlmProvider,
    config: &LlmConfig,
    keys: &ApiKeys,
) -> Result<Box<dyn ModelClient>, LlmError> {
    debug!(
        "Using {} model {}",
        provider.display_name(),
        config.model_for(provider)
    );
    match provider {
        LlmProvider::Gemini => {
            let key = keys.gemini().ok_or(LlmError::MissingApiKey("Gemini"))?;
            Ok(Box::new(GeminiClient::new(key, config)?))
        }
        LlmProvider::Groq => {
            let key = keys.groq().ok_or(LlmError::MissingApiKey("Groq"))?;
            Ok(Box::new(GroqClient::new(key, config)?))
        }
    }
}

/// Turn a non-success response into the matching error.
async fn check_status(resp: Response) -> Result<Response, LlmError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    if status.as_u16() == 429 {
        let retry_after = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok());
        let retry_after_secs = retry::parse_retry_after(retry_after).map(|d| d.as_secs());
        warn!("Rate limited by {}", resp.url().host_str().unwrap_or("provider"));
        return Err(LlmError::RateLimited { retry_after_secs });
    }

    let body = resp.text().await.unwrap_or_default();
    Err(LlmError::Api {
        status: status.as_u16(),
        body,
    })
}
