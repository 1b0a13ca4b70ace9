//! Error types for the wellness metrics library
//!
//! Input problems live in [`crate::validation::ValidationError`]. The types
//! here cover the storage capability and configuration loading.

use thiserror::Error;

/// Failure reported by a key-value storage backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[cfg(feature = "config-file")]
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
