//! Model client configuration.

use serde::{Deserialize, Serialize};

/// Hosted model provider.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini (generateContent API)
    #[default]
    Gemini,
    /// Groq (OpenAI-compatible chat completions)
    Groq,
}

impl LlmProvider {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "groq" => Some(Self::Groq),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini",
            LlmProvider::Groq => "groq",
        }
    }

    /// Label shown to users.
    pub fn display_name(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "Gemini",
            LlmProvider::Groq => "Groq",
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration shared by the model clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider used when none is given on the command line
    #[serde(default)]
    pub default_provider: LlmProvider,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    /// Gemini API root, without the `/v1beta` suffix
    #[serde(default = "default_gemini_endpoint")]
    pub gemini_endpoint: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
    /// OpenAI-compatible base URL for Groq
    #[serde(default = "default_groq_base_url")]
    pub groq_base_url: String,
    /// Maximum tokens in response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature for generation (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries after a transient failure
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay for exponential backoff
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_groq_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_groq_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_max_tokens() -> u32 {
    200
}

fn default_temperature() -> f32 {
    0.3
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    1
}

fn default_retry_base_ms() -> u64 {
    1000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            default_provider: LlmProvider::default(),
            gemini_model: default_gemini_model(),
            gemini_endpoint: default_gemini_endpoint(),
            groq_model: default_groq_model(),
            groq_base_url: default_groq_base_url(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_base_ms: default_retry_base_ms(),
        }
    }
}

impl LlmConfig {
    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `DOCPROMPT_MODEL`: "gemini" or "groq"
    /// - `GROQ_BASE_URL`: OpenAI-compatible endpoint for Groq
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("DOCPROMPT_MODEL").and_then(|v| LlmProvider::parse(&v)) {
            self.default_provider = provider;
        }
        if let Some(url) = lookup("GROQ_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.groq_base_url = url.trim_end_matches('/').to_string();
        }
        self
    }

    /// Model name configured for `provider`.
    pub fn model_for(&self, provider: LlmProvider) -> &str {
        match provider {
            LlmProvider::Gemini => &self.gemini_model,
            LlmProvider::Groq => &self.groq_model,
        }
    }

    /// API endpoint configured for `provider`.
    pub fn endpoint_for(&self, provider: LlmProvider) -> &str {
        match provider {
            LlmProvider::Gemini => &self.gemini_endpoint,
            LlmProvider::Groq => &self.groq_base_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = LlmConfig::default();
        assert_eq!(config.default_provider, LlmProvider::Gemini);
        assert_eq!(config.model_for(LlmProvider::Groq), "llama-3.3-70b-versatile");
        assert_eq!(config.endpoint_for(LlmProvider::Groq), "https://api.groq.com/openai/v1");
        assert_eq!(config.max_tokens, 200);
        assert_eq!(config.max_retries, 1);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("DOCPROMPT_MODEL", "Groq"),
            ("GROQ_BASE_URL", "http://localhost:9000/v1/"),
        ]
        .into_iter()
        .collect();
        let config =
            LlmConfig::default().with_overrides_from(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.default_provider, LlmProvider::Groq);
        assert_eq!(config.groq_base_url, "http://localhost:9000/v1");
    }

    #[test]
    fn test_unknown_provider_override_is_ignored() {
        let config = LlmConfig::default().with_overrides_from(|k| {
            (k == "DOCPROMPT_MODEL").then(|| "ollama".to_string())
        });
        assert_eq!(config.default_provider, LlmProvider::Gemini);
    }

    #[test]
    fn test_partial_toml() {
        let config: LlmConfig = toml::from_str("default_provider = \"groq\"\nmax_tokens = 512").unwrap();
        assert_eq!(config.default_provider, LlmProvider::Groq);
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.gemini_model, "gemini-1.5-flash");
    }
}
