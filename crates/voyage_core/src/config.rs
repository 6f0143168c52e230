//! Environment configuration.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `VOYAGE_MODEL` | `ollama/gemma3:4b` |
//! | `OLLAMA_HOST` | `http://localhost:11434` |
//! | `SERPAPI_KEY` (or `APIKEY`) | unset |
//! | `SERPAPI_ENDPOINT` (or `APIENDPOINT`) | `https://serpapi.com/search` |
//! | `VOYAGE_CITIES` | unset, built-in table |
//! | `VOYAGE_USER_ID` | `anonymous` |
//! | `VOYAGE_MAX_ITERATIONS` | `10` |
//! | `VOYAGE_PROVIDER_TIMEOUT_SECS` | `60` |
//! | `VOYAGE_TOOL_TIMEOUT_SECS` | `30` |
//! | `VOYAGE_LOG_FORMAT` | `pretty` |
//!
//! Empty values count as unset.

use crate::tracing_setup::TracingFormat;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "ollama/gemma3:4b";
/// Default Ollama server address.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
/// Default SerpAPI endpoint.
pub const DEFAULT_SERPAPI_ENDPOINT: &str = "https://serpapi.com/search";
/// User id used when none is configured.
pub const DEFAULT_USER_ID: &str = "anonymous";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set to a value that cannot be used.
    #[error("invalid value '{value}' for {key}")]
    Invalid {
        /// The environment variable.
        key: String,
        /// The rejected value.
        value: String,
    },
}

/// Runtime configuration of the assistant.
#[derive(Debug, Clone, PartialEq)]
pub struct VoyageConfig {
    /// Model identifier, `provider/model`.
    pub model_id: String,
    /// Ollama server address.
    pub ollama_url: String,
    /// SerpAPI key; search tools report a failure without one.
    pub serpapi_key: Option<String>,
    /// SerpAPI endpoint.
    pub serpapi_endpoint: String,
    /// City table file; the built-in table when unset.
    pub cities_path: Option<PathBuf>,
    /// User id of the session.
    pub user_id: String,
    /// Maximum model calls per run.
    pub max_iterations: usize,
    /// Bound on a single model call.
    pub provider_timeout: Duration,
    /// Bound on a single tool call.
    pub tool_timeout: Duration,
    /// Log output format.
    pub log_format: TracingFormat,
}

impl Default for VoyageConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            serpapi_key: None,
            serpapi_endpoint: DEFAULT_SERPAPI_ENDPOINT.to_string(),
            cities_path: None,
            user_id: DEFAULT_USER_ID.to_string(),
            max_iterations: 10,
            provider_timeout: Duration::from_secs(60),
            tool_timeout: Duration::from_secs(30),
            log_format: TracingFormat::Pretty,
        }
    }
}

impl VoyageConfig {
    /// Loads `.env` if present, then reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            tracing::warn!(error = %err, "ignoring unreadable .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            model_id: get("VOYAGE_MODEL").unwrap_or(defaults.model_id),
            ollama_url: get("OLLAMA_HOST").unwrap_or(defaults.ollama_url),
            serpapi_key: get("SERPAPI_KEY").or_else(|| get("APIKEY")),
            serpapi_endpoint: get("SERPAPI_ENDPOINT")
                .or_else(|| get("APIENDPOINT"))
                .unwrap_or(defaults.serpapi_endpoint),
            cities_path: get("VOYAGE_CITIES").map(PathBuf::from),
            user_id: get("VOYAGE_USER_ID").unwrap_or(defaults.user_id),
            max_iterations: positive(&get, "VOYAGE_MAX_ITERATIONS")?
                .unwrap_or(defaults.max_iterations),
            provider_timeout: positive(&get, "VOYAGE_PROVIDER_TIMEOUT_SECS")?
                .map_or(defaults.provider_timeout, Duration::from_secs),
            tool_timeout: positive(&get, "VOYAGE_TOOL_TIMEOUT_SECS")?
                .map_or(defaults.tool_timeout, Duration::from_secs),
            log_format: parsed(&get, "VOYAGE_LOG_FORMAT")?.unwrap_or(defaults.log_format),
        })
    }
}

fn parsed<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    get(key)
        .map(|value| {
            value.trim().parse().map_err(|_| ConfigError::Invalid {
                key: key.to_string(),
                value,
            })
        })
        .transpose()
}

fn positive<T: FromStr + PartialOrd + Default>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match parsed::<T>(get, key)? {
        Some(n) if n <= T::default() => Err(ConfigError::Invalid {
            key: key.to_string(),
            value: get(key).unwrap_or_default(),
        }),
        other => Ok(other),
    }
}
