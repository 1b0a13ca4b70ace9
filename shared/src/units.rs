//! Unit system handling
//!
//! Measurements arrive in whatever system the user picked on the form.
//! Everything is converted to SI (meters, kilograms) at this boundary so
//! the formulas in [`crate::health_metrics`] never see imperial values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Meters in one inch
pub const METERS_PER_INCH: f64 = 0.0254;

/// Kilograms in one pound
pub const KG_PER_LB: f64 = 0.453592;

/// Inches in one foot
pub const INCHES_PER_FOOT: f64 = 12.0;

// ============================================================================
// Unit System
// ============================================================================

/// Unit system chosen for a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Height in centimeters, weight in kilograms
    #[default]
    Metric,
    /// Height in feet (plus optional inches), weight in pounds
    Imperial,
}

impl UnitSystem {
    /// Convert a height reading to meters.
    ///
    /// For [`UnitSystem::Metric`] `value` is centimeters and `inches` is
    /// ignored. For [`UnitSystem::Imperial`] `value` is feet and `inches`
    /// defaults to zero when absent.
    pub fn height_to_meters(&self, value: f64, inches: Option<f64>) -> f64 {
        match self {
            UnitSystem::Metric => value / 100.0,
            UnitSystem::Imperial => {
                let total_inches = value * INCHES_PER_FOOT + inches.unwrap_or(0.0);
                total_inches * METERS_PER_INCH
            }
        }
    }

    /// Convert a weight reading to kilograms
    pub fn weight_to_kg(&self, value: f64) -> f64 {
        match self {
            UnitSystem::Metric => value,
            UnitSystem::Imperial => value * KG_PER_LB,
        }
    }

    /// Weight unit abbreviation
    pub fn weight_abbreviation(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "kg",
            UnitSystem::Imperial => "lbs",
        }
    }

    /// Human-readable summary of the raw height/weight as the user typed them
    pub fn describe(&self, height: f64, inches: Option<f64>, weight: f64) -> String {
        match self {
            UnitSystem::Metric => format!(
                "{:.1} cm · {:.1} {}",
                height,
                weight,
                self.weight_abbreviation()
            ),
            UnitSystem::Imperial => format!(
                "{}′ {:.1}″ · {:.1} {}",
                height,
                inches.unwrap_or(0.0),
                weight,
                self.weight_abbreviation()
            ),
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Metric => write!(f, "metric"),
            UnitSystem::Imperial => write!(f, "imperial"),
        }
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "si" => Ok(UnitSystem::Metric),
            "imperial" | "us" => Ok(UnitSystem::Imperial),
            _ => Err(format!("Unknown unit system: {}", s)),
        }
    }
}
