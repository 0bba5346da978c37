//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve the database path and logging options shared by shells.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Resolution never fails; invalid values surface later where they are used.

use crate::logging::default_log_level;
use std::path::PathBuf;

/// Env var overriding the task database location.
pub const ENV_DB_PATH: &str = "TABDECK_DB_PATH";
/// Env var overriding the log level (`trace|debug|info|warn|error`).
pub const ENV_LOG_LEVEL: &str = "TABDECK_LOG_LEVEL";
/// Env var enabling file logging into an absolute directory.
pub const ENV_LOG_DIR: &str = "TABDECK_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "tabdeck.sqlite3";

/// Shell configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite file holding the key-value store.
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging is disabled when `None`.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(default_db_path),
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        }
    }
}

/// Default database location under the system temp directory.
pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}
