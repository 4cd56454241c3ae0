//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MARKET_API_BASE` - Base URL of the remote service (e.g. `https://api.example.com/v2`)
//! - `MARKET_API_PATH` - The store's API path segment
//!
//! ## Optional
//! - `MARKET_TOKEN_FILE` - Where the session token is persisted
//!   (default: `<user config dir>/marketstand/token.json`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the remote service. Always ends with a trailing slash so
    /// endpoint paths join below it instead of replacing the last segment.
    pub base_url: Url,
    /// The store's API path segment, spliced into `/api/{path}/...` routes.
    pub api_path: String,
    /// Where the session token file lives.
    pub token_path: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base = get_required_env("MARKET_API_BASE")?;
        let base_url = parse_base_url(&base)
            .map_err(|e| ConfigError::InvalidEnvVar("MARKET_API_BASE".to_owned(), e.to_string()))?;
        let api_path = get_required_env("MARKET_API_PATH")?;
        let token_path = std::env::var("MARKET_TOKEN_FILE")
            .map_or_else(|_| default_token_path(), PathBuf::from);

        Ok(Self {
            base_url,
            api_path,
            token_path,
        })
    }

    /// Build a configuration directly, normalizing the base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not a valid absolute URL.
    pub fn new(
        base_url: &str,
        api_path: impl Into<String>,
        token_path: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("base_url".to_owned(), e.to_string()))?;
        Ok(Self {
            base_url,
            api_path: api_path.into(),
            token_path: token_path.into(),
        })
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Parse the base URL, guaranteeing a trailing slash so `Url::join` treats
/// the final path segment as a directory.
fn parse_base_url(raw: &str) -> Result<Url, url::ParseError> {
    if raw.ends_with('/') {
        Url::parse(raw)
    } else {
        Url::parse(&format!("{raw}/"))
    }
}

/// Default location of the persisted token, beside other per-user state.
fn default_token_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("marketstand")
        .join("token.json")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gains_trailing_slash() {
        let config = ClientConfig::new("https://api.example.com/v2", "mystore", "/tmp/t.json").unwrap();
        assert_eq!(config.base_url.as_str(), "https://api.example.com/v2/");
        // Joined paths must land under /v2, not replace it.
        let joined = config.base_url.join("admin/signin").unwrap();
        assert_eq!(joined.as_str(), "https://api.example.com/v2/admin/signin");
    }

    #[test]
    fn test_existing_trailing_slash_is_kept() {
        let config = ClientConfig::new("https://api.example.com/v2/", "mystore", "/tmp/t.json").unwrap();
        assert_eq!(config.base_url.as_str(), "https://api.example.com/v2/");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = ClientConfig::new("not a url", "mystore", "/tmp/t.json").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("MARKET_API_BASE".to_owned());
        assert_eq!(err.to_string(), "Missing environment variable: MARKET_API_BASE");
    }
}
