//! Configuration management for storage and retention settings.

/// Database connection and schema management
pub mod database;

/// Settings file loading from leadbox.toml
pub mod settings;

pub use settings::{RetentionSettings, Settings, StorageSettings};

use crate::errors::Result;
use std::path::PathBuf;
use std::time::Duration;

/// Default location of the optional settings file.
pub const SETTINGS_FILE: &str = "leadbox.toml";

/// Resolved application configuration: settings file values with
/// environment overrides applied, ready to hand to the store constructor.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Relational backend URL; file-only mode when absent
    pub database_url: Option<String>,
    /// Where the JSON fallback file lives
    pub fallback_path: PathBuf,
    /// Connection pool upper bound
    pub max_connections: u32,
    /// How long to wait for a fresh connection
    pub connect_timeout: Duration,
    /// How long to wait for a pooled connection
    pub acquire_timeout: Duration,
    /// How long an idle pooled connection survives
    pub idle_timeout: Duration,
    /// Retention threshold for cleanup, in days
    pub retention_days: u32,
}

impl AppConfig {
    /// Loads `leadbox.toml` (when present) and applies environment
    /// overrides: `DATABASE_URL` for the relational backend and
    /// `CONTACTS_FILE` for the fallback path.
    ///
    /// # Errors
    /// Returns `Error::Config` when the settings file exists but cannot be
    /// parsed.
    pub fn load() -> Result<Self> {
        let settings = settings::load_settings(SETTINGS_FILE)?;
        Ok(Self::from_settings(settings))
    }

    /// Builds the configuration from already-parsed settings plus the
    /// environment.
    #[must_use]
    pub fn from_settings(settings: Settings) -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or(settings.storage.database_url);
        let fallback_path = std::env::var("CONTACTS_FILE")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map_or(settings.storage.fallback_path, PathBuf::from);

        Self {
            database_url,
            fallback_path,
            max_connections: settings.storage.max_connections,
            connect_timeout: Duration::from_secs(settings.storage.connect_timeout_secs),
            acquire_timeout: Duration::from_secs(settings.storage.acquire_timeout_secs),
            idle_timeout: Duration::from_secs(settings.storage.idle_timeout_secs),
            retention_days: settings.retention.max_age_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_deployment() {
        let config = AppConfig::from_settings(Settings::default());
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.connect_timeout, Duration::from_secs(60));
        assert_eq!(config.acquire_timeout, Duration::from_secs(60));
        assert_eq!(config.retention_days, 90);
        assert_eq!(config.fallback_path, PathBuf::from("data/contacts.json"));
    }

    #[test]
    fn settings_file_values_carry_through() {
        let settings: Settings = toml::from_str(
            r#"
            [storage]
            fallback_path = "backup/contacts.json"
            max_connections = 5

            [retention]
            max_age_days = 14
            "#,
        )
        .expect("valid settings");

        let config = AppConfig::from_settings(settings);
        assert_eq!(config.fallback_path, PathBuf::from("backup/contacts.json"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.retention_days, 14);
    }
}
