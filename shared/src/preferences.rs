//! UI preferences (theme, tips toggle)
//!
//! Stored next to the history under its own key, with the same
//! best-effort persistence rules.

use crate::config::PreferencesConfig;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Persisted UI preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub theme: Theme,
    pub tips_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            tips_enabled: true,
        }
    }
}

/// Loads and saves [`Preferences`] through a [`KeyValueStore`]
pub struct PreferencesStore<S> {
    storage: S,
    key: String,
    current: Preferences,
}

impl<S: KeyValueStore> PreferencesStore<S> {
    pub fn new(storage: S, config: &PreferencesConfig) -> Self {
        let mut store = Self {
            storage,
            key: config.storage_key.clone(),
            current: Preferences::default(),
        };
        store.load();
        store
    }

    /// Reload from storage, falling back to defaults on any failure
    pub fn load(&mut self) -> Preferences {
        self.current = match self.storage.get(&self.key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(key = %self.key, error = %e, "Discarding corrupt preferences");
                Preferences::default()
            }),
            Ok(None) => Preferences::default(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Preferences storage unreadable");
                Preferences::default()
            }
        };
        self.current
    }

    pub fn current(&self) -> Preferences {
        self.current
    }

    pub fn set_theme(&mut self, theme: Theme) -> Preferences {
        self.current.theme = theme;
        self.persist();
        self.current
    }

    pub fn set_tips_enabled(&mut self, enabled: bool) -> Preferences {
        self.current.tips_enabled = enabled;
        self.persist();
        self.current
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.current)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.storage
                    .set(&self.key, &json)
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = result {
            warn!(key = %self.key, error = %e, "Failed to persist preferences");
        }
    }
}
