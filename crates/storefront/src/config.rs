//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BAZAAR_API_URL` - Base URL of the marketplace REST API
//!
//! ## Optional
//! - `BAZAAR_API_TOKEN` - Bearer token for authenticated calls
//! - `BAZAAR_USER_ID` - Authenticated user ID; the cart is keyed per user,
//!   falling back to a shared anonymous cart when absent
//! - `BAZAAR_STORAGE_DIR` - Directory for persisted cart state
//!   (default: `.bazaar`)
//! - `BAZAAR_REQUEST_TIMEOUT_SECS` - HTTP request timeout (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use bazaar_core::UserId;

use crate::cart::CartOwner;

const DEFAULT_STORAGE_DIR: &str = ".bazaar";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront engine configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the marketplace API, always ending in `/` so endpoint
    /// paths join cleanly.
    pub api_base_url: Url,
    /// Bearer token for authenticated API calls.
    pub api_token: Option<SecretString>,
    /// Authenticated user the cart belongs to, if signed in.
    pub user_id: Option<UserId>,
    /// Directory holding persisted cart state.
    pub storage_dir: PathBuf,
    /// Timeout applied to every API request.
    pub request_timeout: Duration,
}

impl StorefrontConfig {
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

        let api_base_url = parse_base_url(&get_required_env("BAZAAR_API_URL")?)?;
        let api_token = get_optional_env("BAZAAR_API_TOKEN").map(SecretString::from);
        let user_id = get_optional_env("BAZAAR_USER_ID").map(UserId::new);
        let storage_dir =
            PathBuf::from(get_env_or_default("BAZAAR_STORAGE_DIR", DEFAULT_STORAGE_DIR));
        let request_timeout_secs = get_env_or_default(
            "BAZAAR_REQUEST_TIMEOUT_SECS",
            &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("BAZAAR_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_base_url,
            api_token,
            user_id,
            storage_dir,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }

    /// Whose cart this configuration selects.
    #[must_use]
    pub fn cart_owner(&self) -> CartOwner {
        self.user_id
            .clone()
            .map_or(CartOwner::Anonymous, CartOwner::User)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse the API base URL, ensuring a trailing slash so `Url::join` treats
/// the last path segment as a directory.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };

    Url::parse(&with_slash)
        .map_err(|e| ConfigError::InvalidEnvVar("BAZAAR_API_URL".to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_appends_slash() {
        let url = parse_base_url("https://api.example.com/api").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/");

        let joined = url.join("coupons/validate").unwrap();
        assert_eq!(
            joined.as_str(),
            "https://api.example.com/api/coupons/validate"
        );
    }

    #[test]
    fn test_parse_base_url_keeps_existing_slash() {
        let url = parse_base_url("https://api.example.com/api/").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/");
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_cart_owner_from_config() {
        let config = StorefrontConfig {
            api_base_url: parse_base_url("https://api.example.com").unwrap(),
            api_token: None,
            user_id: None,
            storage_dir: PathBuf::from(".bazaar"),
            request_timeout: Duration::from_secs(30),
        };
        assert_eq!(config.cart_owner(), CartOwner::Anonymous);

        let config = StorefrontConfig {
            user_id: Some(UserId::new("u-1")),
            ..config
        };
        assert_eq!(config.cart_owner(), CartOwner::User(UserId::new("u-1")));
    }
}
