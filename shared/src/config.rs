//! Configuration management for the wellness metrics stores
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config file (config/wellness.toml), optional
//! 3. Environment variables (prefix: WELLNESS__)
//!
//! Browser builds disable the `config-file` feature and use the defaults.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Default number of history entries kept
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// Storage key for the serialized history log
pub const HISTORY_STORAGE_KEY: &str = "wellnessHistory";

/// Storage key for the serialized UI preferences
pub const PREFERENCES_STORAGE_KEY: &str = "wellnessPrefs";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WellnessConfig {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
}

/// History store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub capacity: usize,
    pub storage_key: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
            storage_key: HISTORY_STORAGE_KEY.to_string(),
        }
    }
}

impl HistoryConfig {
    /// Default key with a custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }
}

/// Preferences store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesConfig {
    pub storage_key: String,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            storage_key: PREFERENCES_STORAGE_KEY.to_string(),
        }
    }
}

impl WellnessConfig {
    /// Load configuration from file and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. `config/wellness.toml` if present
    /// 3. Environment variables with WELLNESS__ prefix
    #[cfg(feature = "config-file")]
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config/wellness")
    }

    /// Load using a specific config file path (extension optional)
    #[cfg(feature = "config-file")]
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&WellnessConfig::default())?)
            .add_source(config::File::with_name(path).required(false))
            // e.g., WELLNESS__HISTORY__CAPACITY=7 sets history.capacity
            .add_source(
                config::Environment::with_prefix("WELLNESS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: WellnessConfig = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject settings the stores cannot operate with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.capacity == 0 {
            return Err(ConfigError::Invalid(
                "history.capacity must be at least 1".to_string(),
            ));
        }
        if self.history.storage_key.is_empty() || self.preferences.storage_key.is_empty() {
            return Err(ConfigError::Invalid("storage keys cannot be empty".to_string()));
        }
        if self.history.storage_key == self.preferences.storage_key {
            return Err(ConfigError::Invalid(
                "history and preferences must use different storage keys".to_string(),
            ));
        }
        Ok(())
    }
}
