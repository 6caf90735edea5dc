//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Default SQLite database URL.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:sanpo.db?mode=rwc";

/// Default location of the on-device state file.
pub const DEFAULT_STATE_PATH: &str = ".sanpo/state.json";

/// Default connection pool size.
pub const DEFAULT_POOL_SIZE: u32 = 5;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite database URL.
    pub database_url: String,
    /// Local state JSON file.
    pub state_path: PathBuf,
    /// Connection pool size.
    pub pool_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SANPO_DATABASE_URL` | SQLite database URL | `sqlite:sanpo.db?mode=rwc` |
    /// | `SANPO_STATE_PATH` | Local state file | `.sanpo/state.json` |
    /// | `SANPO_POOL_SIZE` | Connection pool size | `5` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url =
            lookup("SANPO_DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let state_path = lookup("SANPO_STATE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_PATH));

        let pool_size = match lookup("SANPO_POOL_SIZE") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidPoolSize(raw)),
            },
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            database_url,
            state_path,
            pool_size,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SANPO_POOL_SIZE must be a positive integer, got '{0}'")]
    InvalidPoolSize(String),
}
