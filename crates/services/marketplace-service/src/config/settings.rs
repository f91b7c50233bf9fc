//! Application settings loaded from environment variables.

use std::env;
use std::time::Duration;

use common::{DatabaseConfig, JwtConfig, ServiceConfig};
use thiserror::Error;

use super::constants::{
    DEFAULT_COUNTER_SYNC_ATTEMPTS, DEFAULT_COUNTER_SYNC_BACKOFF_MS, DEFAULT_DATABASE_MAX_CONNECTIONS,
    DEFAULT_DATABASE_MIN_CONNECTIONS, DEFAULT_DATABASE_URL, DEFAULT_JWT_LEEWAY_SECONDS,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEV_JWT_SECRET, MIN_JWT_SECRET_LENGTH, SERVICE_NAME,
};

/// Configuration loading failures
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("JWT_SECRET environment variable must be set in production")]
    MissingJwtSecret,

    #[error("JWT_SECRET must be at least {0} characters long")]
    JwtSecretTooShort(usize),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Retry policy for category index updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSyncConfig {
    pub attempts: u32,
    pub backoff_ms: u64,
}

impl IndexSyncConfig {
    /// Delay before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_ms.saturating_mul(u64::from(attempt)))
    }
}

impl Default for IndexSyncConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_COUNTER_SYNC_ATTEMPTS,
            backoff_ms: DEFAULT_COUNTER_SYNC_BACKOFF_MS,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    pub server: ServiceConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub index_sync: IndexSyncConfig,
}

impl MarketplaceConfig {
    /// Load configuration from environment variables (and `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) => secret,
            None if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            None => return Err(ConfigError::MissingJwtSecret),
        };

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::JwtSecretTooShort(MIN_JWT_SECRET_LENGTH));
        }

        let index_sync = IndexSyncConfig {
            attempts: parse_or(&lookup, "COUNTER_SYNC_ATTEMPTS", DEFAULT_COUNTER_SYNC_ATTEMPTS)?
                .max(1),
            backoff_ms: parse_or(&lookup, "COUNTER_SYNC_BACKOFF_MS", DEFAULT_COUNTER_SYNC_BACKOFF_MS)?,
        };

        Ok(Self {
            server: ServiceConfig {
                service_name: SERVICE_NAME.to_string(),
                host: lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
                port: parse_or(&lookup, "SERVER_PORT", DEFAULT_SERVER_PORT)?,
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
                max_connections: parse_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_DATABASE_MAX_CONNECTIONS,
                )?,
                min_connections: parse_or(
                    &lookup,
                    "DATABASE_MIN_CONNECTIONS",
                    DEFAULT_DATABASE_MIN_CONNECTIONS,
                )?,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                leeway_seconds: DEFAULT_JWT_LEEWAY_SECONDS,
            },
            index_sync,
        })
    }

    /// Get JWT secret bytes for token verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt.secret.as_bytes()
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_defaults_applied() {
        let config = MarketplaceConfig::from_lookup(lookup_from(&[("JWT_SECRET", SECRET)])).unwrap();
        assert_eq!(config.server.port, DEFAULT_SERVER_PORT);
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(config.index_sync, IndexSyncConfig::default());
    }

    #[test]
    fn test_overrides_parsed() {
        let config = MarketplaceConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("SERVER_PORT", "8081"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("COUNTER_SYNC_ATTEMPTS", "5"),
            ("COUNTER_SYNC_BACKOFF_MS", "10"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.index_sync.attempts, 5);
        assert_eq!(config.index_sync.backoff(3), Duration::from_millis(30));
    }

    #[test]
    fn test_short_secret_rejected() {
        let err = MarketplaceConfig::from_lookup(lookup_from(&[("JWT_SECRET", "short")])).unwrap_err();
        assert_eq!(err, ConfigError::JwtSecretTooShort(MIN_JWT_SECRET_LENGTH));
    }

    #[test]
    fn test_bad_number_rejected() {
        let err = MarketplaceConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("SERVER_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "SERVER_PORT", .. }));
    }

    #[test]
    fn test_zero_attempts_clamped() {
        let config = MarketplaceConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("COUNTER_SYNC_ATTEMPTS", "0"),
        ]))
        .unwrap();
        assert_eq!(config.index_sync.attempts, 1);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = MarketplaceConfig::from_lookup(lookup_from(&[("JWT_SECRET", SECRET)])).unwrap();
        assert!(!format!("{:?}", config).contains(SECRET));
    }
}
