//! JSON shapes handed back to the page
//!
//! Every exported calculation returns either one of these views or an
//! [`ErrorResponse`], serialized to a JSON string.

use serde::Serialize;
use wellness_metrics_shared::{
    body_fat_descriptor, ActivityLevel, BiologicalSex, BmiCategory, BmiResult, BmrResult, HistoryEntry,
    Measurement, Tone, ValidationError, CALORIE_ADJUSTMENT_TIP,
};

/// API error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorResponse {
    pub fn invalid_choice(field: &str, message: String) -> Self {
        Self {
            error: ErrorDetail {
                code: "INVALID_CHOICE".to_string(),
                message,
                field: Some(field.to_string()),
            },
        }
    }
}

impl From<ValidationError> for ErrorResponse {
    fn from(err: ValidationError) -> Self {
        Self {
            error: ErrorDetail {
                code: "VALIDATION_ERROR".to_string(),
                message: err.user_message(),
                field: Some(err.field),
            },
        }
    }
}

/// Ideal weight bounds, rounded for display
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightRangeView {
    pub min_kg: f64,
    pub max_kg: f64,
}

/// BMI result card
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BmiView {
    pub bmi: f64,
    pub bmi_display: String,
    pub category: BmiCategory,
    pub tone: Tone,
    pub message: &'static str,
    pub gauge_percent: f64,
    pub ideal_weight_range: WeightRangeView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fat_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fat_descriptor: Option<&'static str>,
    pub weight_change: String,
    pub summary: String,
    pub sex: BiologicalSex,
    pub age_years: f64,
}

impl BmiView {
    pub fn new(measurement: &Measurement, result: &BmiResult) -> Self {
        let (min_kg, max_kg) = result.ideal_weight_range_kg.rounded();
        Self {
            bmi: result.bmi,
            bmi_display: format!("{:.2}", result.bmi),
            category: result.category,
            tone: result.category.tone(),
            message: result.category.message(),
            gauge_percent: result.gauge_percent(),
            ideal_weight_range: WeightRangeView { min_kg, max_kg },
            body_fat_percent: result.body_fat_percent,
            body_fat_descriptor: result
                .body_fat_percent
                .map(|bf| body_fat_descriptor(bf, measurement.sex)),
            weight_change: result.weight_change_message(),
            summary: measurement.summary(),
            sex: measurement.sex,
            age_years: measurement.age_years,
        }
    }
}

/// BMR result card
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BmrView {
    pub bmr_kcal: i64,
    pub daily_needs_kcal: i64,
    pub activity_multiplier: f64,
    pub tip: &'static str,
}

impl From<&BmrResult> for BmrView {
    fn from(result: &BmrResult) -> Self {
        Self {
            bmr_kcal: result.bmr_kcal,
            daily_needs_kcal: result.daily_needs_kcal,
            activity_multiplier: result.activity_multiplier,
            tip: CALORIE_ADJUSTMENT_TIP,
        }
    }
}

/// Activity preset for the BMR form's select
#[derive(Debug, Clone, Serialize)]
pub struct ActivityLevelView {
    pub level: ActivityLevel,
    pub multiplier: f64,
    pub description: &'static str,
}

impl From<ActivityLevel> for ActivityLevelView {
    fn from(level: ActivityLevel) -> Self {
        Self {
            level,
            multiplier: level.multiplier(),
            description: level.description(),
        }
    }
}

/// History list item: the persisted entry plus its display lines
#[derive(Debug, Clone, Serialize)]
pub struct HistoryItemView<'a> {
    #[serde(flatten)]
    pub entry: &'a HistoryEntry,
    pub primary: String,
    pub secondary: String,
}

impl<'a> From<&'a HistoryEntry> for HistoryItemView<'a> {
    fn from(entry: &'a HistoryEntry) -> Self {
        let (primary, secondary) = entry.display_lines();
        Self {
            entry,
            primary,
            secondary,
        }
    }
}

/// Serialize a view, falling back to a serialization error payload
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        format!(
            r#"{{"error":{{"code":"SERIALIZATION_ERROR","message":"{}"}}}}"#,
            e.to_string().replace('"', "'")
        )
    })
}
