//! Common test utilities for integration tests
//!
//! Storage doubles and fixtures shared by the store tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use wellness_metrics_shared::{
    compute_bmi, BiologicalSex, HistoryEntry, KeyValueStore, Measurement, StorageError,
};

/// Install a test-writer subscriber so `warn!`/`debug!` output shows up
/// with `--nocapture`. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Storage whose reads and/or writes can be switched to fail
#[derive(Default)]
pub struct FlakyStorage {
    values: RefCell<HashMap<String, String>>,
    pub fail_reads: Cell<bool>,
    pub fail_writes: Cell<bool>,
    pub writes: Cell<usize>,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl KeyValueStore for FlakyStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.get() {
            return Err(StorageError::Unavailable("reads disabled".to_string()));
        }
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes.set(self.writes.get() + 1);
        if self.fail_writes.get() {
            return Err(StorageError::QuotaExceeded("writes disabled".to_string()));
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub fn timestamp(second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 18, 30, second).unwrap()
}

/// BMI history entry for a metric measurement
pub fn bmi_entry(height_cm: f64, weight_kg: f64, second: u32) -> HistoryEntry {
    let m = Measurement::metric(height_cm, weight_kg, 35.0, BiologicalSex::Female);
    let result = compute_bmi(&m).unwrap();
    HistoryEntry::from_bmi(&m, &result, timestamp(second))
}
