//! Configuration management
//!
//! Settings live in settings.json inside the bankline directory:
//! ```json
//! {
//!   "app": { "databaseFile": "bankline.duckdb", "eventLog": true }
//! }
//! ```
//! Keys this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Default database file name, relative to the bankline directory
pub const DEFAULT_DATABASE_FILE: &str = "bankline.duckdb";

fn default_database_file() -> String {
    DEFAULT_DATABASE_FILE.to_string()
}

fn default_true() -> bool {
    true
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default = "default_database_file")]
    database_file: String,
    #[serde(default = "default_true")]
    event_log: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            event_log: true,
            other: HashMap::new(),
        }
    }
}

/// Bankline configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    /// Account database file name, relative to the bankline directory
    pub database_file: String,
    /// Whether commands are recorded in logs.duckdb
    pub event_log: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            event_log: true,
        }
    }
}

fn read_settings(settings_path: &Path) -> Result<SettingsFile> {
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(settings_path)?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

impl Config {
    /// Load config from the bankline directory
    ///
    /// The event log can also be switched with BANKLINE_EVENT_LOG
    /// (true/false/1/0/yes/no), which wins over the file.
    pub fn load(bankline_dir: &Path) -> Result<Self> {
        let raw = read_settings(&bankline_dir.join("settings.json"))?;

        let event_log = match std::env::var("BANKLINE_EVENT_LOG").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.event_log,
        };

        Ok(Self {
            database_file: raw.app.database_file,
            event_log,
        })
    }

    /// Save config to the bankline directory
    /// Preserves other settings that this crate doesn't manage
    pub fn save(&self, bankline_dir: &Path) -> Result<()> {
        let settings_path = bankline_dir.join("settings.json");
        let mut settings = read_settings(&settings_path)?;

        settings.app.database_file = self.database_file.clone();
        settings.app.event_log = self.event_log;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Absolute path of the account database
    pub fn database_path(&self, bankline_dir: &Path) -> PathBuf {
        bankline_dir.join(&self.database_file)
    }
}
