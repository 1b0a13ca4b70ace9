//! Wellness Metrics Shared Library
//!
//! Pure BMI/BMR/body-fat calculations plus the small persistent stores
//! (history, preferences) used by the browser front end. Storage is always
//! injected through [`storage::KeyValueStore`].

pub mod config;
pub mod errors;
pub mod health_metrics;
pub mod history;
pub mod preferences;
pub mod storage;
pub mod tips;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use crate::config::{HistoryConfig, PreferencesConfig, WellnessConfig};
pub use errors::*;
pub use health_metrics::*;
pub use history::{HistoryEntry, HistoryLog, HistoryPayload, HistoryStore};
pub use preferences::{Preferences, PreferencesStore, Theme};
pub use storage::{KeyValueStore, MemoryStorage};
pub use tips::{pick_tip, tip_for_roll, TipSelector, WELLNESS_TIPS};
pub use units::*;
pub use validation::ValidationError;
