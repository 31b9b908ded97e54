//! Process configuration read from the environment.
//!
//! Every value is optional here; tools report a missing value only when they
//! actually need it. Explicit tool arguments always take precedence.
//!
//! Recognized variables:
//! - `WOLAI_APP_ID`, `WOLAI_APP_SECRET`: app credentials for `get_token`
//! - `WOLAI_BLOCK_ID`: default parent for `create_blocks`
//! - `WOLAI_DATABASE_ID`: default database for `create_database_rows`
//! - `WOLAI_API_BASE_URL`: API base URL override
//! - `WOLAI_REQUEST_TIMEOUT_SECS`: HTTP timeout in seconds

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::api::client::REQUEST_TIMEOUT_SECS;
use crate::api::DEFAULT_BASE_URL;

pub const ENV_APP_ID: &str = "WOLAI_APP_ID";
pub const ENV_APP_SECRET: &str = "WOLAI_APP_SECRET";
pub const ENV_BLOCK_ID: &str = "WOLAI_BLOCK_ID";
pub const ENV_DATABASE_ID: &str = "WOLAI_DATABASE_ID";
pub const ENV_BASE_URL: &str = "WOLAI_API_BASE_URL";
pub const ENV_REQUEST_TIMEOUT: &str = "WOLAI_REQUEST_TIMEOUT_SECS";

#[derive(Clone, Default)]
pub struct Config {
    pub app_id: Option<String>,
    pub app_secret: Option<String>,
    pub block_id: Option<String>,
    pub database_id: Option<String>,
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let request_timeout_secs = match get(ENV_REQUEST_TIMEOUT) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid {}: {}", ENV_REQUEST_TIMEOUT, raw))?,
            ),
            None => None,
        };

        Ok(Self {
            app_id: get(ENV_APP_ID),
            app_secret: get(ENV_APP_SECRET),
            block_id: get(ENV_BLOCK_ID),
            database_id: get(ENV_DATABASE_ID),
            base_url: get(ENV_BASE_URL),
            request_timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(REQUEST_TIMEOUT_SECS))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("app_id", &self.app_id)
            .field("app_secret", &self.app_secret.as_ref().map(|_| "<redacted>"))
            .field("block_id", &self.block_id)
            .field("database_id", &self.database_id)
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert!(config.app_id.is_none());
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(REQUEST_TIMEOUT_SECS));
    }

    #[test]
    fn test_reads_all_variables() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_APP_ID, "app"),
            (ENV_APP_SECRET, "secret"),
            (ENV_BLOCK_ID, "page1"),
            (ENV_DATABASE_ID, "db1"),
            (ENV_BASE_URL, "http://localhost:8080/v1"),
            (ENV_REQUEST_TIMEOUT, "5"),
        ]))
        .unwrap();

        assert_eq!(config.app_id.as_deref(), Some("app"));
        assert_eq!(config.app_secret.as_deref(), Some("secret"));
        assert_eq!(config.block_id.as_deref(), Some("page1"));
        assert_eq!(config.database_id.as_deref(), Some("db1"));
        assert_eq!(config.base_url(), "http://localhost:8080/v1");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = Config::from_lookup(lookup_from(&[(ENV_APP_ID, ""), (ENV_BLOCK_ID, "  ")]))
            .unwrap();
        assert!(config.app_id.is_none());
        assert!(config.block_id.is_none());
    }

    #[test]
    fn test_invalid_timeout_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[(ENV_REQUEST_TIMEOUT, "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config {
            app_secret: Some("hunter2".to_string()),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
