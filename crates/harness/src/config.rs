//! Suite configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults target a local backend.
//!
//! - `API_BASE_URL` - Backend base URL (default: `http://localhost:8080/api`)
//! - `ADMIN_USERNAME` - Platform admin username (default: `admin`)
//! - `ADMIN_PASSWORD` - Platform admin password (default: `Admin@123456`)
//! - `OWNER_PASSWORD` - Password assigned to provisioned shop owners
//!   (default: `TestPassword123`)
//! - `SUITE_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `SUITE_MAX_RETRIES` - Retries on `429` (default: 5)
//! - `SUITE_INITIAL_WAIT_MS` - First backoff wait (default: 1000)
//! - `SUITE_BACKOFF_FACTOR` - Backoff multiplier (default: 2.0)

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::retry::RetryPolicy;

const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "Admin@123456";
const DEFAULT_OWNER_PASSWORD: &str = "TestPassword123";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Suite configuration.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Backend base URL without trailing slash (e.g. `http://localhost:8080/api`)
    pub base_url: String,
    /// Platform admin username
    pub admin_username: String,
    /// Platform admin password
    pub admin_password: String,
    /// Password assigned to shop owners provisioned by the suite
    pub owner_password: String,
    /// Per-request connect/read timeout
    pub http_timeout: Duration,
    /// Retry policy applied to every backend call
    pub retry: RetryPolicy,
}

impl SuiteConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `API_BASE_URL` is not a
    /// valid URL or a numeric variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = optional_env("API_BASE_URL", DEFAULT_BASE_URL);
        Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("API_BASE_URL".to_string(), e.to_string()))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let timeout_secs: u64 = parse_env("SUITE_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        let max_retries: u32 = parse_env("SUITE_MAX_RETRIES", 5)?;
        let initial_wait_ms: u64 = parse_env("SUITE_INITIAL_WAIT_MS", 1000)?;
        let backoff_factor: f64 = parse_env("SUITE_BACKOFF_FACTOR", 2.0)?;

        Ok(Self {
            base_url,
            admin_username: optional_env("ADMIN_USERNAME", DEFAULT_ADMIN_USERNAME),
            admin_password: optional_env("ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD),
            owner_password: optional_env("OWNER_PASSWORD", DEFAULT_OWNER_PASSWORD),
            http_timeout: Duration::from_secs(timeout_secs),
            retry: RetryPolicy {
                max_retries,
                initial_wait: Duration::from_millis(initial_wait_ms),
                backoff_factor,
            },
        })
    }
}

/// Get an optional environment variable with a default.
fn optional_env(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional environment variable, falling back to a default.
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_env() {
        let config = SuiteConfig::from_env().expect("default config should load");
        assert!(config.base_url.starts_with("http"));
        assert!(!config.base_url.ends_with('/'));
        assert!(config.retry.backoff_factor >= 1.0);
    }
}
