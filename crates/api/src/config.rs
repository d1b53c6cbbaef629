//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `VITRINE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `VITRINE_HOST` - Bind address (default: 127.0.0.1)
//! - `VITRINE_PORT` - Listen port (default: 8000)
//! - `VITRINE_BASE_URL` - Public URL, used for pagination links (default: http://localhost:8000)
//! - `VITRINE_MEDIA_URL` - Base URL for uploaded images (default: /media/)
//! - `VITRINE_PAGE_SIZE` - Public product page size, 1 to 100 (default: 20)
//! - `VITRINE_TRUST_PROXY` - Read the client IP from proxy headers (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

/// Largest page size a deployment may configure.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the API, without trailing slash
    pub base_url: String,
    /// Base URL under which image paths are served
    pub media_url: String,
    /// Number of products per public page
    pub page_size: u32,
    /// Whether a reverse proxy sets `X-Forwarded-For` and friends
    pub trust_proxy: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl ApiConfig {
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

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let database_url = env.database_url("VITRINE_DATABASE_URL")?;
        let host: IpAddr = env.parse_or_default("VITRINE_HOST", "127.0.0.1")?;
        let port: u16 = env.parse_or_default("VITRINE_PORT", "8000")?;
        let base_url = env
            .get_or_default("VITRINE_BASE_URL", "http://localhost:8000")
            .trim_end_matches('/')
            .to_owned();
        let media_url = env.get_or_default("VITRINE_MEDIA_URL", "/media/");

        let page_size: u32 = env.parse_or_default("VITRINE_PAGE_SIZE", "20")?;
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(ConfigError::InvalidEnvVar(
                "VITRINE_PAGE_SIZE".to_string(),
                format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }

        let trust_proxy: bool = env.parse_or_default("VITRINE_TRUST_PROXY", "false")?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            media_url,
            page_size,
            trust_proxy,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the API is served over HTTPS (controls the cookie `Secure` flag).
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to a default.
    fn parse_or_default<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Get database URL with fallback to generic `DATABASE_URL`.
    fn database_url(&self, primary_key: &str) -> Result<SecretString, ConfigError> {
        self.optional(primary_key)
            .or_else(|| self.optional("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("VITRINE_DATABASE_URL", "postgres://localhost/vitrine")]).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8000");
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.media_url, "/media/");
        assert_eq!(config.page_size, 20);
        assert!(config.sentry_dsn.is_none());
        assert!(!config.is_https());
        assert!(!config.trust_proxy);
    }

    #[test]
    fn test_database_url_required() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "VITRINE_DATABASE_URL"));
    }

    #[test]
    fn test_database_url_fallback() {
        let config = load(&[("DATABASE_URL", "postgres://fly/db")]).unwrap();
        assert_eq!(config.database_url.expose_secret(), "postgres://fly/db");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/vitrine"),
            ("VITRINE_BASE_URL", "https://api.vitrine.sn/"),
        ])
        .unwrap();
        assert_eq!(config.base_url, "https://api.vitrine.sn");
        assert!(config.is_https());
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[
            ("DATABASE_URL", "postgres://localhost/vitrine"),
            ("VITRINE_PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "VITRINE_PORT"));
    }

    #[test]
    fn test_page_size_bounds() {
        for bad in ["0", "101", "-3"] {
            let result = load(&[
                ("DATABASE_URL", "postgres://localhost/vitrine"),
                ("VITRINE_PAGE_SIZE", bad),
            ]);
            assert!(result.is_err(), "page size {bad} accepted");
        }

        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/vitrine"),
            ("VITRINE_PAGE_SIZE", "50"),
        ])
        .unwrap();
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn test_trust_proxy_flag() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/vitrine"),
            ("VITRINE_TRUST_PROXY", "true"),
        ])
        .unwrap();
        assert!(config.trust_proxy);

        let err = load(&[
            ("DATABASE_URL", "postgres://localhost/vitrine"),
            ("VITRINE_TRUST_PROXY", "yes please"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "VITRINE_TRUST_PROXY"));
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = load(&[("DATABASE_URL", "postgres://app:hunter2@db/vitrine")]).unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("hunter2"));
    }
}
