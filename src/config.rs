//! Configuration management using the prefer crate for file discovery.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::extract::DEFAULT_CACHE_CAPACITY;
use crate::llm::LlmConfig;
use crate::prompt::Persona;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set. Add it to your environment or .env file")]
    MissingCredential(&'static str),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
}

/// Document extraction settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Extracted batches kept in memory; 0 disables caching
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
        }
    }
}

/// Configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Persona used when none is given on the command line
    #[serde(default)]
    pub default_persona: Persona,
    /// Path the config was loaded from
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist and parse. Otherwise prefer discovers a
    /// `docprompt` config in the standard locations; a missing or broken
    /// discovered file falls back to defaults.
    pub async fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::load_from_path(&resolve_path(path)).await?,
            None => Self::discover().await,
        };
        Ok(config.with_env_overrides())
    }

    async fn discover() -> Self {
        match prefer::load("docprompt").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => match Self::load_from_path(path).await {
                    Ok(config) => config,
                    Err(e) => {
                        warn!("Ignoring config {}: {}", path.display(), e);
                        Self::default()
                    }
                },
                None => Self::default(),
            },
            Err(_) => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents).map_err(|e| ConfigError::Parse {
                format: "TOML",
                message: e.to_string(),
            })?,
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
                format: "YAML",
                message: e.to_string(),
            })?,
            _ => serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
                format: "JSON",
                message: e.to_string(),
            })?,
        };

        debug!("Loaded config from {}", path.display());
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `DOCPROMPT_MODEL`: default provider
    /// - `DOCPROMPT_PERSONA`: default persona label
    /// - `GROQ_BASE_URL`: Groq endpoint
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(label) = lookup("DOCPROMPT_PERSONA") {
            self.default_persona = Persona::from_label(label.trim());
        }
        self.llm = self.llm.with_overrides_from(lookup);
        self
    }
}

/// Expand `~` in a user-supplied path.
fn resolve_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

/// Provider credentials, read from the environment only.
#[derive(Clone, Default)]
pub struct ApiKeys {
    gemini: Option<String>,
    groq: Option<String>,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("gemini", &self.gemini.as_ref().map(|_| "<set>"))
            .field("groq", &self.groq.as_ref().map(|_| "<set>"))
            .finish()
    }
}

impl ApiKeys {
    pub fn new(gemini: Option<String>, groq: Option<String>) -> Self {
        Self { gemini, groq }
    }

    /// Read `GOOGLE_API_KEY` (or `GEMINI_API_KEY`) and `GROQ_API_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            gemini: non_empty("GOOGLE_API_KEY").or_else(|| non_empty("GEMINI_API_KEY")),
            groq: non_empty("GROQ_API_KEY"),
        }
    }

    /// Fail unless every provider has a key.
    pub fn require_all(&self) -> Result<(), ConfigError> {
        if self.gemini.is_none() {
            return Err(ConfigError::MissingCredential("GOOGLE_API_KEY"));
        }
        if self.groq.is_none() {
            return Err(ConfigError::MissingCredential("GROQ_API_KEY"));
        }
        Ok(())
    }

    pub fn gemini(&self) -> Option<&str> {
        self.gemini.as_deref()
    }

    pub fn groq(&self) -> Option<&str> {
        self.groq.as_deref()
    }
}
