//! Host configuration resolved from the environment.
//!
//! # Invariants
//! - Blank or missing values fall back to defaults.
//! - Resolution never fails; invalid log levels surface at `init_logging`.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "PHONEBOOK_DB_PATH";
pub const LOG_DIR_ENV: &str = "PHONEBOOK_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "PHONEBOOK_LOG_LEVEL";

const DEFAULT_DB_FILE_NAME: &str = "phonebook.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "phonebook-logs";

/// Where a host keeps its contact database and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonebookConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl PhonebookConfig {
    /// Resolves config from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves config through `lookup`, which maps a variable name to its
    /// value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_dir: non_blank(LOG_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME)),
            log_level: non_blank(LOG_LEVEL_ENV)
                .unwrap_or_else(|| default_log_level().to_string()),
        }
    }
}

impl Default for PhonebookConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::{PhonebookConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::default_log_level;
    use std::path::PathBuf;

    #[test]
    fn defaults_live_in_temp_dir() {
        let config = PhonebookConfig::default();
        assert_eq!(
            config.db_path,
            std::env::temp_dir().join("phonebook.sqlite3")
        );
        assert!(config.log_dir.starts_with(std::env::temp_dir()));
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn lookup_values_override_defaults_and_blanks_fall_back() {
        let config = PhonebookConfig::from_lookup(|key| match key {
            DB_PATH_ENV => Some(" /data/contacts.db ".to_string()),
            LOG_DIR_ENV => Some("   ".to_string()),
            LOG_LEVEL_ENV => Some("warn".to_string()),
            _ => None,
        });
        assert_eq!(config.db_path, PathBuf::from("/data/contacts.db"));
        assert_eq!(config.log_dir, PhonebookConfig::default().log_dir);
        assert_eq!(config.log_level, "warn");
    }
}
