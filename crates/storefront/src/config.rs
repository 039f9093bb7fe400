//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `COTD_STORE_ID` - Store to open when none is given on the command line
//! - `COTD_FIREBASE_URL` - Realtime database base URL; without it inventory is
//!   kept in process memory
//! - `COTD_SYNC_POLL_MS` - Remote poll interval in milliseconds (default: 2000)
//! - `COTD_CACHE_DIR` - Directory for the local order cache (default: `.cotd-cache`)
//! - `COTD_KEY_STRATEGY` - `timestamp` (default) or `uuid`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use catch_of_the_day_core::StoreId;
use thiserror::Error;
use url::Url;

use crate::keys::KeyStrategy;

const DEFAULT_POLL_MS: u64 = 2000;
const DEFAULT_CACHE_DIR: &str = ".cotd-cache";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Store opened by default
    pub default_store: Option<StoreId>,
    /// Remote inventory sync configuration
    pub remote: RemoteConfig,
    /// Directory holding the local order cache
    pub cache_dir: PathBuf,
    /// How new fish keys are generated
    pub key_strategy: KeyStrategy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Remote inventory sync configuration.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Realtime database base URL (`None` keeps inventory in memory)
    pub firebase_url: Option<Url>,
    /// Delay between two polls of the remote value
    pub poll_interval: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            firebase_url: None,
            poll_interval: Duration::from_millis(DEFAULT_POLL_MS),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default_store = lookup("COTD_STORE_ID")
            .map(|value| {
                StoreId::parse(&value)
                    .map_err(|e| ConfigError::InvalidEnvVar("COTD_STORE_ID".to_string(), e.to_string()))
            })
            .transpose()?;

        let firebase_url = lookup("COTD_FIREBASE_URL")
            .map(|value| {
                Url::parse(&value).map_err(|e| {
                    ConfigError::InvalidEnvVar("COTD_FIREBASE_URL".to_string(), e.to_string())
                })
            })
            .transpose()?;

        let poll_ms = get_or_default(&lookup, "COTD_SYNC_POLL_MS", &DEFAULT_POLL_MS.to_string())
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar("COTD_SYNC_POLL_MS".to_string(), e.to_string()))?;
        if poll_ms == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "COTD_SYNC_POLL_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let cache_dir = PathBuf::from(get_or_default(&lookup, "COTD_CACHE_DIR", DEFAULT_CACHE_DIR));

        let key_strategy = get_or_default(&lookup, "COTD_KEY_STRATEGY", "timestamp")
            .parse::<KeyStrategy>()
            .map_err(|e| ConfigError::InvalidEnvVar("COTD_KEY_STRATEGY".to_string(), e))?;

        Ok(Self {
            default_store,
            remote: RemoteConfig {
                firebase_url,
                poll_interval: Duration::from_millis(poll_ms),
            },
            cache_dir,
            key_strategy,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert!(config.default_store.is_none());
        assert!(config.remote.firebase_url.is_none());
        assert_eq!(config.remote.poll_interval, Duration::from_secs(2));
        assert_eq!(config.cache_dir, PathBuf::from(".cotd-cache"));
        assert_eq!(config.key_strategy, KeyStrategy::Timestamp);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_all_values() {
        let config = load(&[
            ("COTD_STORE_ID", "shop-1"),
            ("COTD_FIREBASE_URL", "https://cotd.example.com"),
            ("COTD_SYNC_POLL_MS", "500"),
            ("COTD_CACHE_DIR", "/var/cache/cotd"),
            ("COTD_KEY_STRATEGY", "uuid"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
        ])
        .unwrap();

        assert_eq!(config.default_store.unwrap().as_str(), "shop-1");
        assert_eq!(
            config.remote.firebase_url.unwrap().as_str(),
            "https://cotd.example.com/"
        );
        assert_eq!(config.remote.poll_interval, Duration::from_millis(500));
        assert_eq!(config.cache_dir, PathBuf::from("/var/cache/cotd"));
        assert_eq!(config.key_strategy, KeyStrategy::Uuid);
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_invalid_store_id() {
        let err = load(&[("COTD_STORE_ID", "a/b")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(var, _) if var == "COTD_STORE_ID"));
    }

    #[test]
    fn test_invalid_url() {
        let err = load(&[("COTD_FIREBASE_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(var, _) if var == "COTD_FIREBASE_URL"));
    }

    #[test]
    fn test_invalid_poll_interval() {
        assert!(load(&[("COTD_SYNC_POLL_MS", "soon")]).is_err());
        assert!(load(&[("COTD_SYNC_POLL_MS", "0")]).is_err());
    }

    #[test]
    fn test_invalid_key_strategy() {
        let err = load(&[("COTD_KEY_STRATEGY", "random")]).unwrap_err();
        assert!(err.to_string().contains("COTD_KEY_STRATEGY"));
    }
}
