//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SEAMLINE_API_BASE_URL` - Base URL of the commerce API
//!   (e.g., <https://api.example.com/api>)
//!
//! ## Optional
//! - `SEAMLINE_DATA_DIR` - Directory for locally persisted state
//!   (default: `.seamline` under the user's home directory, or the
//!   current directory if no home is set)
//! - `SEAMLINE_HTTP_TIMEOUT_SECS` - HTTP request timeout (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DATA_DIR_NAME: &str = ".seamline";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the commerce API.
    pub api_base_url: Url,
    /// Directory for locally persisted state (cart mirror, session).
    pub data_dir: PathBuf,
    /// HTTP request timeout.
    pub http_timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("SEAMLINE_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SEAMLINE_API_BASE_URL".to_string(), e.to_string())
            })?;

        let data_dir = get_optional_env("SEAMLINE_DATA_DIR")
            .map_or_else(default_data_dir, PathBuf::from);

        let timeout_secs = get_env_or_default(
            "SEAMLINE_HTTP_TIMEOUT_SECS",
            &DEFAULT_HTTP_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("SEAMLINE_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_base_url,
            data_dir,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Default persisted-state directory: `$HOME/.seamline`, falling back to
/// `./.seamline` when no home directory is available.
fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from(DATA_DIR_NAME),
        |home| PathBuf::from(home).join(DATA_DIR_NAME),
    )
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_data_dir_ends_with_app_dir() {
        let dir = default_data_dir();
        assert!(dir.ends_with(DATA_DIR_NAME));
    }

    #[test]
    fn test_get_env_or_default_falls_back() {
        let value = get_env_or_default("SEAMLINE_TEST_UNSET_VARIABLE", "fallback");
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_missing_required_env() {
        let err = get_required_env("SEAMLINE_TEST_UNSET_VARIABLE").unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }
}
