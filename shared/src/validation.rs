//! Input validation functions
//!
//! Raw numbers come straight from form inputs, so anything can show up:
//! empty fields parsed as NaN, negatives, infinities. These helpers reject
//! them with a field-scoped [`ValidationError`] the UI can show inline.

use thiserror::Error;

/// Upper bound (exclusive) for the inches part of an imperial height
pub const MAX_INCHES: f64 = 12.0;

// ============================================================================
// Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "height" => "Height",
        "height_inches" => "Inches",
        "weight" => "Weight",
        "age" => "Age",
        "activity_multiplier" => "Activity level",
        "waist" => "Waist",
        "neck" => "Neck",
        "hip" => "Hip",
        _ => field_name,
    }
}

// ============================================================================
// Validation Error
// ============================================================================

/// Validation error with field context
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}: {reason}", get_field_display_label(.field))]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &str, reason: &str) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Display label for the offending field
    pub fn display_label(&self) -> &str {
        get_field_display_label(&self.field)
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

// ============================================================================
// Validators
// ============================================================================

/// Require a finite value strictly greater than zero
pub fn require_positive(field: &str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::new(
            field,
            "must be a number greater than zero",
        ));
    }
    Ok(value)
}

/// Require the inches part of an imperial height to sit in `[0, 12)`
pub fn require_inches(value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || !(0.0..MAX_INCHES).contains(&value) {
        return Err(ValidationError::new(
            "height_inches",
            "must be between 0 and 11.9",
        ));
    }
    Ok(value)
}

/// Require a usable activity multiplier: a number, and greater than zero.
///
/// No upper bound; the UI picks from a fixed list.
pub fn require_multiplier(field: &str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "must be a valid number"));
    }
    require_positive(field, value)
}
