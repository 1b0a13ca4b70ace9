//! Calculation history
//!
//! A short, newest-first log of past BMI/BMR results, persisted as JSON
//! through an injected [`KeyValueStore`]. History is a convenience: storage
//! failures are logged and swallowed, and the in-memory log always reflects
//! the last operation.

use crate::config::HistoryConfig;
use crate::health_metrics::{BmiCategory, BmiResult, BmrResult, Measurement};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ============================================================================
// Entries
// ============================================================================

/// Kind-specific fields of a history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum HistoryPayload {
    #[serde(rename = "BMI")]
    Bmi { bmi: f64, category: BmiCategory },
    #[serde(rename = "BMR", rename_all = "camelCase")]
    Bmr { bmr: i64, daily_needs: i64 },
}

/// One recorded calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub payload: HistoryPayload,
    pub timestamp: DateTime<Utc>,
    pub summary: String,
}

impl HistoryEntry {
    /// Entry for a BMI result; the summary echoes the units the user typed
    pub fn from_bmi(measurement: &Measurement, result: &BmiResult, at: DateTime<Utc>) -> Self {
        Self {
            payload: HistoryPayload::Bmi {
                bmi: result.bmi,
                category: result.category,
            },
            timestamp: at,
            summary: measurement.summary(),
        }
    }

    /// Entry for a BMR result; the summary is always metric
    pub fn from_bmr(measurement: &Measurement, result: &BmrResult, at: DateTime<Utc>) -> Self {
        let summary = match measurement.normalize() {
            Ok(body) => format!(
                "{:.1} kg · {:.1} cm · {} yrs",
                body.weight_kg,
                body.height_cm(),
                body.age_years
            ),
            Err(_) => measurement.summary(),
        };

        Self {
            payload: HistoryPayload::Bmr {
                bmr: result.bmr_kcal,
                daily_needs: result.daily_needs_kcal,
            },
            timestamp: at,
            summary,
        }
    }

    /// Primary and secondary lines for a history list item
    pub fn display_lines(&self) -> (String, String) {
        match &self.payload {
            HistoryPayload::Bmi { bmi, category } => (
                format!("BMI {:.1} ({})", bmi, category.label()),
                self.summary.clone(),
            ),
            HistoryPayload::Bmr { bmr, daily_needs } => (
                format!("BMR {} kcal", bmr),
                format!("Needs: {} kcal", daily_needs),
            ),
        }
    }
}

/// Newest-first sequence of entries
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry
    pub fn first(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    fn prepend(&mut self, entry: HistoryEntry, capacity: usize) {
        self.entries.insert(0, entry);
        self.entries.truncate(capacity);
    }
}

// ============================================================================
// Store
// ============================================================================

/// Owns the in-memory history log and mirrors it to storage
pub struct HistoryStore<S> {
    storage: S,
    key: String,
    capacity: usize,
    log: HistoryLog,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Create the store and load whatever history is already persisted.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(storage: S, config: &HistoryConfig) -> Self {
        let mut store = Self {
            storage,
            key: config.storage_key.clone(),
            capacity: config.capacity.max(1),
            log: HistoryLog::default(),
        };
        store.load();
        store
    }

    /// Reload from storage. Missing, unreadable or corrupt data yields an
    /// empty log; an over-long log is cut down to capacity.
    pub fn load(&mut self) -> &HistoryLog {
        self.log = match self.storage.get(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<HistoryLog>(&raw) {
                Ok(mut log) => {
                    log.entries.truncate(self.capacity);
                    log
                }
                Err(e) => {
                    warn!(key = %self.key, error = %e, "Discarding corrupt history");
                    HistoryLog::default()
                }
            },
            Ok(None) => HistoryLog::default(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "History storage unreadable");
                HistoryLog::default()
            }
        };
        debug!(entries = self.log.len(), "History loaded");
        &self.log
    }

    /// Prepend an entry, truncate to capacity and persist
    pub fn record(&mut self, entry: HistoryEntry) -> &HistoryLog {
        self.log.prepend(entry, self.capacity);
        debug!(entries = self.log.len(), "History entry recorded");
        self.persist();
        &self.log
    }

    /// Drop every entry and persist the empty log
    pub fn clear(&mut self) -> &HistoryLog {
        self.log = HistoryLog::default();
        debug!("History cleared");
        self.persist();
        &self.log
    }

    /// Current in-memory log
    pub fn log(&self) -> &HistoryLog {
        &self.log
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.log) {
            Ok(json) => json,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to serialize history");
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.key, &json) {
            warn!(key = %self.key, error = %e, "Failed to persist history");
        }
    }
}
