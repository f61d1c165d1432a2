//! Centralized bot configuration.
//!
//! Loaded via the `config` crate from `HERO_GUIDE__*` environment variables.
//! Nested sections use `__` as separator, e.g. `HERO_GUIDE__STORAGE__DATA_FILE`.

use serde::Deserialize;
use std::path::PathBuf;

const ENV_PREFIX: &str = "HERO_GUIDE";

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Username of the super admin, without the leading '@'.
    pub super_admin: String,

    /// Chat id of the channel holding every video.
    pub source_channel: i64,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub audit: AuditConfig,
}

/// Content repository location.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// JSON document holding tutorials, stories and admins.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

/// Action log location.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Directory for daily log files and exported reports.
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("tutorial_data.json")
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("user_logs")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            logs_dir: default_logs_dir(),
        }
    }
}

impl BotConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(environment())
    }

    fn from_source(source: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}
