//! Environment-driven runtime configuration.
//!
//! # Responsibility
//! - Resolve storage location, storage key and logging options.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution never fails; every field except `log_dir` has a default.

use crate::logging::default_log_level;
use crate::storage::gateway::STORAGE_KEY;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "TODO_DB_PATH";
pub const STORAGE_KEY_ENV: &str = "TODO_STORAGE_KEY";
pub const LOG_LEVEL_ENV: &str = "TODO_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TODO_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "todo_app.sqlite3";

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file holding the key-value store.
    pub db_path: PathBuf,
    /// Key the snapshot is stored under.
    pub storage_key: String,
    /// Level passed to `init_logging`.
    pub log_level: String,
    /// Absolute log directory; file logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            storage_key: STORAGE_KEY.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };
        let defaults = Self::default();

        Self {
            db_path: value(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            storage_key: value(STORAGE_KEY_ENV).unwrap_or(defaults.storage_key),
            log_level: value(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: value(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}
