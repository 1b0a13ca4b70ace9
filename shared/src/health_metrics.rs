//! Health metrics calculations module
//!
//! Validates raw anthropometric input and derives BMI, BMR, a US Navy
//! body-fat estimate and the ideal weight range for a height.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: No storage, presentation or randomness here
//! 2. **SI Internally**: Inputs are normalized to meters/kilograms first
//! 3. **Ordered Tables**: Category lookups scan sorted breakpoints, first
//!    threshold `>=` value wins

use crate::units::UnitSystem;
use crate::validation::{require_multiplier, require_inches, require_positive, ValidationError};
use serde::{Deserialize, Serialize};

// ============================================================================
// Input Types
// ============================================================================

/// Biological sex for health calculations
/// Note: This is used for physiological calculations only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    Male,
    Female,
}

impl std::str::FromStr for BiologicalSex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(BiologicalSex::Male),
            "female" | "f" => Ok(BiologicalSex::Female),
            _ => Err(format!("Unknown biological sex: {}", s)),
        }
    }
}

/// Raw measurement as entered by the user
///
/// `height_value` is centimeters for [`UnitSystem::Metric`] and feet for
/// [`UnitSystem::Imperial`]; `height_inches` only applies to imperial.
/// Circumferences are always centimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub system: UnitSystem,
    pub height_value: f64,
    #[serde(default)]
    pub height_inches: Option<f64>,
    pub weight_value: f64,
    pub age_years: f64,
    pub sex: BiologicalSex,
    #[serde(default)]
    pub waist_cm: Option<f64>,
    #[serde(default)]
    pub neck_cm: Option<f64>,
    #[serde(default)]
    pub hip_cm: Option<f64>,
}

impl Measurement {
    /// Metric measurement: height in cm, weight in kg
    pub fn metric(height_cm: f64, weight_kg: f64, age_years: f64, sex: BiologicalSex) -> Self {
        Self {
            system: UnitSystem::Metric,
            height_value: height_cm,
            height_inches: None,
            weight_value: weight_kg,
            age_years,
            sex,
            waist_cm: None,
            neck_cm: None,
            hip_cm: None,
        }
    }

    /// Imperial measurement: height in feet + inches, weight in pounds
    pub fn imperial(
        feet: f64,
        inches: f64,
        weight_lbs: f64,
        age_years: f64,
        sex: BiologicalSex,
    ) -> Self {
        Self {
            system: UnitSystem::Imperial,
            height_value: feet,
            height_inches: Some(inches),
            ..Self::metric(0.0, weight_lbs, age_years, sex)
        }
    }

    /// Attach body circumferences (cm) for the body-fat estimate
    pub fn with_circumferences(mut self, waist: f64, neck: f64, hip: Option<f64>) -> Self {
        self.waist_cm = Some(waist);
        self.neck_cm = Some(neck);
        self.hip_cm = hip;
        self
    }

    /// Validate and convert to SI units.
    ///
    /// Fields are checked in order height, inches, weight, age; the first
    /// failure is returned.
    pub fn normalize(&self) -> Result<BodyMetrics, ValidationError> {
        require_positive("height", self.height_value)?;
        if self.system == UnitSystem::Imperial {
            if let Some(inches) = self.height_inches {
                require_inches(inches)?;
            }
        }
        require_positive("weight", self.weight_value)?;
        let age_years = require_positive("age", self.age_years)?;

        Ok(BodyMetrics {
            height_m: self.system.height_to_meters(self.height_value, self.height_inches),
            weight_kg: self.system.weight_to_kg(self.weight_value),
            age_years,
        })
    }

    /// Summary of the raw height/weight, in the units the user typed
    pub fn summary(&self) -> String {
        self.system
            .describe(self.height_value, self.height_inches, self.weight_value)
    }
}

/// Validated measurement in SI units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyMetrics {
    pub height_m: f64,
    pub weight_kg: f64,
    pub age_years: f64,
}

impl BodyMetrics {
    pub fn height_cm(&self) -> f64 {
        self.height_m * 100.0
    }
}

// ============================================================================
// Ordered Threshold Lookup
// ============================================================================

/// Return the value paired with the smallest threshold `>= value`.
///
/// `table` must be sorted by threshold and end with `f64::INFINITY`.
fn lookup_ascending<T: Copy>(table: &[(f64, T)], value: f64) -> T {
    let idx = table.partition_point(|(max, _)| value > *max);
    table[idx.min(table.len() - 1)].1
}

// ============================================================================
// BMI Calculations
// ============================================================================

/// Lower bound of the normal BMI band used for weight targets
pub const NORMAL_BMI_MIN: f64 = 18.5;

/// Upper bound of the normal BMI band used for weight targets
pub const NORMAL_BMI_MAX: f64 = 24.9;

/// BMI category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

/// Advisory tone shown alongside a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Green,
    Yellow,
    Red,
}

/// BMI breakpoints, ascending. Ties go to the lower category.
pub const BMI_CATEGORY_TABLE: [(f64, BmiCategory); 4] = [
    (18.4, BmiCategory::Underweight),
    (24.9, BmiCategory::Normal),
    (29.9, BmiCategory::Overweight),
    (f64::INFINITY, BmiCategory::Obese),
];

impl BmiCategory {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            BmiCategory::Normal => Tone::Green,
            BmiCategory::Underweight | BmiCategory::Overweight => Tone::Yellow,
            BmiCategory::Obese => Tone::Red,
        }
    }

    /// One-line advice for this category
    pub fn message(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => {
                "Add nourishing calories and strength-building movement."
            }
            BmiCategory::Normal => "You’re on track—keep your balanced routine humming.",
            BmiCategory::Overweight => "Ramp up daily activity and prioritize whole foods.",
            BmiCategory::Obese => "Partner with a healthcare pro for a personalized plan.",
        }
    }
}

/// Calculate BMI from SI weight and height
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight_kg: f64, height_m: f64) -> f64 {
    weight_kg / (height_m * height_m)
}

/// Classify BMI into category
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    lookup_ascending(&BMI_CATEGORY_TABLE, bmi)
}

/// Weight range in kilograms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightRange {
    pub min_kg: f64,
    pub max_kg: f64,
}

impl WeightRange {
    /// Bounds rounded to one decimal, for display only
    pub fn rounded(&self) -> (f64, f64) {
        (round1(self.min_kg), round1(self.max_kg))
    }

    /// Clamp a weight into the range
    pub fn clamp(&self, weight_kg: f64) -> f64 {
        weight_kg.max(self.min_kg).min(self.max_kg)
    }
}

/// Calculate ideal weight range for a given height
///
/// Based on BMI 18.5-24.9 (normal band)
pub fn ideal_weight_range(height_m: f64) -> WeightRange {
    let height_m_sq = height_m * height_m;
    WeightRange {
        min_kg: NORMAL_BMI_MIN * height_m_sq,
        max_kg: NORMAL_BMI_MAX * height_m_sq,
    }
}

/// Direction of a suggested weight change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Gain,
    Lose,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Gain => "gain",
            Direction::Lose => "lose",
        }
    }
}

/// Weight change needed to reach the normal BMI band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WeightChange {
    NoChangeNeeded,
    Adjust {
        /// Signed: positive to gain, negative to lose
        delta_kg: f64,
        direction: Direction,
        /// BMI at the target weight (edge of the normal band)
        target_bmi: f64,
    },
}

impl WeightChange {
    pub fn message(&self) -> String {
        match self {
            WeightChange::NoChangeNeeded => "You're already in the normal range.".to_string(),
            WeightChange::Adjust {
                delta_kg,
                direction,
                target_bmi,
            } => format!(
                "You’d need to {} {:.1} kg to sit at BMI {:.1}.",
                direction.as_str(),
                delta_kg.abs(),
                target_bmi
            ),
        }
    }
}

/// Weight delta that would bring BMI into `[18.5, 24.9]`
pub fn weight_change_to_normal(bmi: f64, weight_kg: f64, height_m: f64) -> WeightChange {
    if (NORMAL_BMI_MIN..=NORMAL_BMI_MAX).contains(&bmi) {
        return WeightChange::NoChangeNeeded;
    }

    let target = ideal_weight_range(height_m).clamp(weight_kg);
    let delta_kg = target - weight_kg;
    let (direction, target_bmi) = if delta_kg > 0.0 {
        (Direction::Gain, NORMAL_BMI_MIN)
    } else {
        (Direction::Lose, NORMAL_BMI_MAX)
    };

    WeightChange::Adjust {
        delta_kg,
        direction,
        target_bmi,
    }
}

/// BMI calculation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    pub bmi: f64,
    pub category: BmiCategory,
    /// Full precision; use [`WeightRange::rounded`] for display
    pub ideal_weight_range_kg: WeightRange,
    /// Absent when circumferences are missing or out of the formula's domain
    pub body_fat_percent: Option<f64>,
    pub weight_change_to_normal: WeightChange,
    pub height_m: f64,
    pub weight_kg: f64,
}

impl BmiResult {
    /// Position on a 0-40 BMI gauge, as a percentage capped at 100
    pub fn gauge_percent(&self) -> f64 {
        (self.bmi / 40.0 * 100.0).min(100.0)
    }

    pub fn weight_change_message(&self) -> String {
        self.weight_change_to_normal.message()
    }
}

const OUT_OF_RANGE: &str = "is outside the supported range";

/// Calculate complete BMI result
pub fn compute_bmi(measurement: &Measurement) -> Result<BmiResult, ValidationError> {
    let body = measurement.normalize()?;
    let bmi = calculate_bmi(body.weight_kg, body.height_m);
    let ideal_weight_range_kg = ideal_weight_range(body.height_m);

    // Heights whose square under/overflows leave no usable normal band
    if !(ideal_weight_range_kg.min_kg > 0.0 && ideal_weight_range_kg.max_kg.is_finite()) {
        return Err(ValidationError::new("height", OUT_OF_RANGE));
    }
    if !bmi.is_finite() {
        return Err(ValidationError::new("weight", OUT_OF_RANGE));
    }

    let body_fat_percent = estimate_body_fat(
        body.height_m,
        measurement.sex,
        measurement.waist_cm,
        measurement.neck_cm,
        measurement.hip_cm,
    );

    Ok(BmiResult {
        bmi,
        category: classify_bmi(bmi),
        ideal_weight_range_kg,
        body_fat_percent,
        weight_change_to_normal: weight_change_to_normal(bmi, body.weight_kg, body.height_m),
        height_m: body.height_m,
        weight_kg: body.weight_kg,
    })
}

// ============================================================================
// BMR Calculations
// ============================================================================

/// Advice shown with every BMR result
pub const CALORIE_ADJUSTMENT_TIP: &str =
    "Adjust calories by ±500 kcal/day to lose or gain roughly 0.45 kg (1 lb) per week.";

/// Activity level presets for the daily needs multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    #[default]
    Sedentary,
    /// Light exercise 1-3 days/week
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise, physical job
    ExtraActive,
}

impl ActivityLevel {
    /// Presets in ascending order of activity
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    /// Get the activity multiplier for daily needs
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::LightlyActive => "Light exercise 1-3 days/week",
            ActivityLevel::ModeratelyActive => "Moderate exercise 3-5 days/week",
            ActivityLevel::VeryActive => "Hard exercise 6-7 days/week",
            ActivityLevel::ExtraActive => "Very hard exercise or physical job",
        }
    }
}

/// BMR calculation result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmrResult {
    pub bmr_kcal: i64,
    pub daily_needs_kcal: i64,
    pub activity_multiplier: f64,
}

/// Unrounded BMR
///
/// Men: BMR = 88.362 + 13.397 × weight(kg) + 4.799 × height(cm) - 5.677 × age(y)
/// Women: BMR = 447.593 + 9.247 × weight(kg) + 3.098 × height(cm) - 4.330 × age(y)
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: f64, sex: BiologicalSex) -> f64 {
    match sex {
        BiologicalSex::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age_years,
        BiologicalSex::Female => {
            447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age_years
        }
    }
}

/// Calculate BMR and daily energy needs
///
/// Daily needs apply the multiplier to the already-rounded BMR.
pub fn compute_bmr(
    measurement: &Measurement,
    activity_multiplier: f64,
) -> Result<BmrResult, ValidationError> {
    let body = measurement.normalize()?;
    let activity_multiplier = require_multiplier("activity_multiplier", activity_multiplier)?;

    let bmr = calculate_bmr(
        body.weight_kg,
        body.height_cm(),
        body.age_years,
        measurement.sex,
    )
    .round();

    Ok(BmrResult {
        bmr_kcal: bmr as i64,
        daily_needs_kcal: (bmr * activity_multiplier).round() as i64,
        activity_multiplier,
    })
}

// ============================================================================
// Body Fat Estimation
// ============================================================================

/// Estimate body fat percentage with the US Navy circumference method
///
/// Returns `None` when a required circumference is missing or non-positive,
/// or when the log argument / result falls outside the formula's domain.
/// Hip is only required for women.
pub fn estimate_body_fat(
    height_m: f64,
    sex: BiologicalSex,
    waist_cm: Option<f64>,
    neck_cm: Option<f64>,
    hip_cm: Option<f64>,
) -> Option<f64> {
    let present = |v: Option<f64>| v.filter(|x| x.is_finite() && *x > 0.0);
    let waist = present(waist_cm)?;
    let neck = present(neck_cm)?;
    let height_cm = height_m * 100.0;

    let (raw, floor) = match sex {
        BiologicalSex::Male => {
            let girth = waist - neck;
            if girth <= 0.0 {
                return None;
            }
            let density = 1.0324 - 0.19077 * girth.log10() + 0.15456 * height_cm.log10();
            (495.0 / density - 450.0, 2.0)
        }
        BiologicalSex::Female => {
            let hip = present(hip_cm)?;
            let girth = waist + hip - neck;
            if girth <= 0.0 {
                return None;
            }
            let density = 1.29579 - 0.35004 * girth.log10() + 0.22100 * height_cm.log10();
            (495.0 / density - 450.0, 5.0)
        }
    };

    if !raw.is_finite() {
        return None;
    }
    Some(raw.clamp(floor, 70.0))
}

/// Body fat band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyFatBand {
    EssentialFat,
    Athletes,
    Fitness,
    Average,
    AboveAverage,
}

impl BodyFatBand {
    pub fn label(&self) -> &'static str {
        match self {
            BodyFatBand::EssentialFat => "Essential fat",
            BodyFatBand::Athletes => "Athletes",
            BodyFatBand::Fitness => "Fitness",
            BodyFatBand::Average => "Average",
            BodyFatBand::AboveAverage => "Above average",
        }
    }
}

const MALE_BODY_FAT_TABLE: [(f64, BodyFatBand); 5] = [
    (5.0, BodyFatBand::EssentialFat),
    (13.0, BodyFatBand::Athletes),
    (17.0, BodyFatBand::Fitness),
    (24.0, BodyFatBand::Average),
    (f64::INFINITY, BodyFatBand::AboveAverage),
];

const FEMALE_BODY_FAT_TABLE: [(f64, BodyFatBand); 5] = [
    (13.0, BodyFatBand::EssentialFat),
    (20.0, BodyFatBand::Athletes),
    (24.0, BodyFatBand::Fitness),
    (31.0, BodyFatBand::Average),
    (f64::INFINITY, BodyFatBand::AboveAverage),
];

/// Classify body fat percentage
pub fn classify_body_fat(body_fat_percent: f64, sex: BiologicalSex) -> BodyFatBand {
    let table = match sex {
        BiologicalSex::Male => &MALE_BODY_FAT_TABLE,
        BiologicalSex::Female => &FEMALE_BODY_FAT_TABLE,
    };
    lookup_ascending(table, body_fat_percent)
}

/// Label for a body fat percentage, e.g. "Fitness"
pub fn body_fat_descriptor(body_fat_percent: f64, sex: BiologicalSex) -> &'static str {
    classify_body_fat(body_fat_percent, sex).label()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    // =========================================================================
    // BMI Tests
    // =========================================================================

    #[test]
    fn test_bmi_calculation() {
        // 70kg, 1.75m -> BMI ~22.86
        let bmi = calculate_bmi(70.0, 1.75);
        assert!((bmi - 22.857).abs() < 0.001);
    }

    #[rstest]
    #[case(10.0, BmiCategory::Underweight)]
    #[case(18.4, BmiCategory::Underweight)]
    #[case(18.5, BmiCategory::Normal)]
    #[case(24.9, BmiCategory::Normal)]
    #[case(25.0, BmiCategory::Overweight)]
    #[case(29.9, BmiCategory::Overweight)]
    #[case(29.91, BmiCategory::Obese)]
    #[case(55.0, BmiCategory::Obese)]
    fn test_bmi_category_boundaries(#[case] bmi: f64, #[case] expected: BmiCategory) {
        assert_eq!(classify_bmi(bmi), expected);
    }

    #[test]
    fn test_category_advice() {
        assert_eq!(BmiCategory::Normal.tone(), Tone::Green);
        assert_eq!(BmiCategory::Underweight.tone(), Tone::Yellow);
        assert_eq!(BmiCategory::Obese.tone(), Tone::Red);
        assert_eq!(BmiCategory::Overweight.label(), "Overweight");
        assert!(BmiCategory::Obese.message().contains("healthcare"));
    }

    #[test]
    fn test_ideal_weight_range() {
        // For 1.75m: 18.5 * 3.0625 = 56.66, 24.9 * 3.0625 = 76.26
        let range = ideal_weight_range(1.75);
        assert!((range.min_kg - 56.65625).abs() < 1e-9);
        assert!((range.max_kg - 76.25625).abs() < 1e-9);
        assert_eq!(range.rounded(), (56.7, 76.3));
    }

    #[test]
    fn test_compute_bmi_metric() {
        let m = Measurement::metric(175.0, 70.0, 30.0, BiologicalSex::Male);
        let result = compute_bmi(&m).unwrap();
        assert!((result.bmi - 22.857142857).abs() < 1e-6);
        assert_eq!(result.category, BmiCategory::Normal);
        assert_eq!(result.weight_change_to_normal, WeightChange::NoChangeNeeded);
        assert_eq!(result.body_fat_percent, None);
        assert!((result.gauge_percent() - 57.142857).abs() < 1e-4);
    }

    #[test]
    fn test_compute_bmi_imperial_matches_metric() {
        // 6'0" = 72in = 182.88cm; 200 lbs = 90.7184 kg
        let imperial = Measurement::imperial(6.0, 0.0, 200.0, 40.0, BiologicalSex::Male);
        let metric = Measurement::metric(182.88, 90.7184, 40.0, BiologicalSex::Male);
        let a = compute_bmi(&imperial).unwrap();
        let b = compute_bmi(&metric).unwrap();
        assert!((a.bmi - b.bmi).abs() < 1e-6);
        assert_eq!(a.category, BmiCategory::Overweight);
    }

    #[rstest]
    #[case(Measurement::metric(0.0, 70.0, 30.0, BiologicalSex::Male), "height")]
    #[case(Measurement::metric(175.0, -1.0, 30.0, BiologicalSex::Male), "weight")]
    #[case(Measurement::metric(175.0, 70.0, 0.0, BiologicalSex::Female), "age")]
    #[case(Measurement::metric(f64::NAN, 70.0, 30.0, BiologicalSex::Male), "height")]
    #[case(Measurement::imperial(5.0, 12.0, 150.0, 30.0, BiologicalSex::Male), "height_inches")]
    #[case(Measurement::imperial(5.0, -1.0, 150.0, 30.0, BiologicalSex::Male), "height_inches")]
    fn test_compute_bmi_validation(#[case] m: Measurement, #[case] field: &str) {
        let err = compute_bmi(&m).unwrap_err();
        assert_eq!(err.field, field);
    }

    #[rstest]
    #[case(Measurement::metric(1e-170, 70.0, 30.0, BiologicalSex::Male), "height")]
    #[case(Measurement::metric(1e200, 70.0, 30.0, BiologicalSex::Male), "height")]
    #[case(Measurement::metric(1.0, f64::MAX, 30.0, BiologicalSex::Female), "weight")]
    fn test_compute_bmi_rejects_unrepresentable_results(#[case] m: Measurement, #[case] field: &str) {
        let err = compute_bmi(&m).unwrap_err();
        assert_eq!(err.field, field);
        assert_eq!(err.reason, "is outside the supported range");
    }

    #[test]
    fn test_validation_order_reports_height_first() {
        let m = Measurement::metric(-1.0, -1.0, -1.0, BiologicalSex::Male);
        assert_eq!(compute_bmi(&m).unwrap_err().field, "height");
    }

    #[test]
    fn test_weight_change_underweight() {
        // 1.80m, 55kg -> BMI 16.98, target 18.5 * 3.24 = 59.94
        let change = weight_change_to_normal(calculate_bmi(55.0, 1.8), 55.0, 1.8);
        match change {
            WeightChange::Adjust {
                delta_kg,
                direction,
                target_bmi,
            } => {
                assert!((delta_kg - 4.94).abs() < 1e-9);
                assert_eq!(direction, Direction::Gain);
                assert_eq!(target_bmi, 18.5);
            }
            WeightChange::NoChangeNeeded => panic!("expected an adjustment"),
        }
        assert_eq!(
            change.message(),
            "You’d need to gain 4.9 kg to sit at BMI 18.5."
        );
    }

    #[test]
    fn test_weight_change_overweight() {
        // 1.80m, 100kg -> target 24.9 * 3.24 = 80.676
        let change = weight_change_to_normal(calculate_bmi(100.0, 1.8), 100.0, 1.8);
        assert_eq!(
            change.message(),
            "You’d need to lose 19.3 kg to sit at BMI 24.9."
        );
    }

    #[rstest]
    #[case(18.5, true)]
    #[case(24.9, true)]
    #[case(21.0, true)]
    #[case(18.49, false)]
    #[case(24.91, false)]
    fn test_weight_change_sentinel(#[case] bmi: f64, #[case] no_change: bool) {
        let height_m = 1.7;
        let weight = bmi * height_m * height_m;
        let change = weight_change_to_normal(bmi, weight, height_m);
        assert_eq!(change == WeightChange::NoChangeNeeded, no_change);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: metric and imperial inputs describing the same body agree
        #[test]
        fn prop_bmi_unit_invariant(
            feet in 4.0f64..7.0,
            inches in 0.0f64..12.0,
            lbs in 80.0f64..400.0
        ) {
            let imperial = Measurement::imperial(feet, inches, lbs, 30.0, BiologicalSex::Female);
            let height_cm = (feet * 12.0 + inches) * 2.54;
            let metric = Measurement::metric(height_cm, lbs * 0.453592, 30.0, BiologicalSex::Female);
            let a = compute_bmi(&imperial).unwrap();
            let b = compute_bmi(&metric).unwrap();
            prop_assert!((a.bmi - b.bmi).abs() < 1e-6);
        }

        /// Property: ideal range is non-empty for any positive height
        #[test]
        fn prop_ideal_range_ordered(height_m in 0.01f64..3.0) {
            let range = ideal_weight_range(height_m);
            prop_assert!(range.min_kg < range.max_kg);
        }

        /// Property: sentinel iff BMI within [18.5, 24.9]
        #[test]
        fn prop_weight_change_sentinel(height_m in 1.2f64..2.2, weight in 30.0f64..200.0) {
            let bmi = calculate_bmi(weight, height_m);
            let change = weight_change_to_normal(bmi, weight, height_m);
            let in_band = (18.5..=24.9).contains(&bmi);
            prop_assert_eq!(change == WeightChange::NoChangeNeeded, in_band);
        }

        /// Property: heavier weight = higher BMI (same height)
        #[test]
        fn prop_bmi_increases_with_weight(
            weight1 in 50.0f64..100.0,
            weight2 in 100.0f64..150.0,
            height in 1.5f64..2.0
        ) {
            prop_assert!(calculate_bmi(weight2, height) > calculate_bmi(weight1, height));
        }
    }

    // =========================================================================
    // BMR Tests
    // =========================================================================

    #[test]
    fn test_activity_presets_ascend() {
        let multipliers: Vec<f64> = ActivityLevel::ALL.iter().map(|l| l.multiplier()).collect();
        assert!(multipliers.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ActivityLevel::default().description(), "Little or no exercise");
        assert_eq!(ActivityLevel::ExtraActive.description(), "Very hard exercise or physical job");
    }

    #[test]
    fn test_bmr_male_reference() {
        let m = Measurement::metric(180.0, 75.0, 25.0, BiologicalSex::Male);
        let result = compute_bmr(&m, 1.2).unwrap();
        let expected = (88.362_f64 + 13.397 * 75.0 + 4.799 * 180.0 - 5.677 * 25.0).round();
        assert_eq!(result.bmr_kcal, expected as i64);
        assert_eq!(result.bmr_kcal, 1815);
        assert_eq!(result.daily_needs_kcal, (1815.0_f64 * 1.2).round() as i64);
    }

    #[test]
    fn test_bmr_female_reference() {
        let m = Measurement::metric(165.0, 60.0, 30.0, BiologicalSex::Female);
        let result = compute_bmr(&m, ActivityLevel::ModeratelyActive.multiplier()).unwrap();
        let expected = (447.593_f64 + 9.247 * 60.0 + 3.098 * 165.0 - 4.330 * 30.0).round();
        assert_eq!(result.bmr_kcal, expected as i64);
        assert_eq!(result.daily_needs_kcal, (expected * 1.55).round() as i64);
        assert_eq!(result.activity_multiplier, 1.55);
    }

    #[test]
    fn test_bmr_validation() {
        let m = Measurement::metric(180.0, 75.0, -5.0, BiologicalSex::Male);
        assert_eq!(compute_bmr(&m, 1.2).unwrap_err().field, "age");

        let m = Measurement::metric(180.0, 75.0, 25.0, BiologicalSex::Male);
        let err = compute_bmr(&m, f64::INFINITY).unwrap_err();
        assert_eq!(err.field, "activity_multiplier");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: male BMR > female BMR (same stats)
        #[test]
        fn prop_male_bmr_higher(
            weight in 50.0f64..100.0,
            height in 160.0f64..190.0,
            age in 20.0f64..60.0
        ) {
            let male = calculate_bmr(weight, height, age, BiologicalSex::Male);
            let female = calculate_bmr(weight, height, age, BiologicalSex::Female);
            prop_assert!(male > female);
        }

        /// Property: daily needs scale with the activity multiplier
        #[test]
        fn prop_daily_needs_above_bmr(multiplier in 1.2f64..1.9) {
            let m = Measurement::metric(175.0, 70.0, 35.0, BiologicalSex::Female);
            let result = compute_bmr(&m, multiplier).unwrap();
            prop_assert!(result.daily_needs_kcal >= result.bmr_kcal);
        }
    }

    // =========================================================================
    // Body Fat Tests
    // =========================================================================

    #[test]
    fn test_body_fat_male() {
        // 178cm, waist 85, neck 38 -> ~17.6%
        let bf = estimate_body_fat(1.78, BiologicalSex::Male, Some(85.0), Some(38.0), None)
            .unwrap();
        assert!(bf > 15.0 && bf < 20.0, "got {}", bf);
    }

    #[test]
    fn test_body_fat_female_requires_hip() {
        assert_eq!(
            estimate_body_fat(1.65, BiologicalSex::Female, Some(75.0), Some(33.0), None),
            None
        );
        let bf = estimate_body_fat(1.65, BiologicalSex::Female, Some(75.0), Some(33.0), Some(100.0))
            .unwrap();
        assert!(bf > 20.0 && bf < 40.0, "got {}", bf);
    }

    #[rstest]
    #[case(None, Some(38.0))]
    #[case(Some(85.0), None)]
    #[case(Some(f64::NAN), Some(38.0))]
    #[case(Some(0.0), Some(38.0))]
    #[case(Some(38.0), Some(38.0))]
    #[case(Some(30.0), Some(38.0))]
    fn test_body_fat_unavailable_male(#[case] waist: Option<f64>, #[case] neck: Option<f64>) {
        assert_eq!(
            estimate_body_fat(1.78, BiologicalSex::Male, waist, neck, None),
            None
        );
    }

    #[test]
    fn test_body_fat_unavailable_female_girth() {
        assert_eq!(
            estimate_body_fat(1.65, BiologicalSex::Female, Some(10.0), Some(40.0), Some(20.0)),
            None
        );
    }

    #[test]
    fn test_body_fat_missing_does_not_fail_bmi() {
        let m = Measurement::metric(178.0, 80.0, 30.0, BiologicalSex::Male)
            .with_circumferences(30.0, 38.0, None);
        let result = compute_bmi(&m).unwrap();
        assert_eq!(result.body_fat_percent, None);
    }

    #[test]
    fn test_body_fat_clamped() {
        // Barely-positive girth pushes the raw formula far below the floor
        let bf = estimate_body_fat(1.78, BiologicalSex::Male, Some(38.5), Some(38.0), None)
            .unwrap();
        assert_eq!(bf, 2.0);
    }

    #[rstest]
    #[case(5.0, BiologicalSex::Male, "Essential fat")]
    #[case(5.1, BiologicalSex::Male, "Athletes")]
    #[case(17.0, BiologicalSex::Male, "Fitness")]
    #[case(24.0, BiologicalSex::Male, "Average")]
    #[case(24.5, BiologicalSex::Male, "Above average")]
    #[case(13.0, BiologicalSex::Female, "Essential fat")]
    #[case(20.0, BiologicalSex::Female, "Athletes")]
    #[case(24.0, BiologicalSex::Female, "Fitness")]
    #[case(31.0, BiologicalSex::Female, "Average")]
    #[case(45.0, BiologicalSex::Female, "Above average")]
    fn test_body_fat_descriptor(
        #[case] percent: f64,
        #[case] sex: BiologicalSex,
        #[case] expected: &str,
    ) {
        assert_eq!(body_fat_descriptor(percent, sex), expected);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Property: male estimate is absent iff waist <= neck, otherwise within [2, 70]
        #[test]
        fn prop_male_body_fat_bounds(
            height_cm in 120.0f64..220.0,
            waist in 40.0f64..160.0,
            neck in 25.0f64..60.0
        ) {
            let bf = estimate_body_fat(height_cm / 100.0, BiologicalSex::Male, Some(waist), Some(neck), None);
            if waist <= neck {
                prop_assert!(bf.is_none());
            } else {
                prop_assert!(bf.is_some(), "estimate missing");
                let bf = bf.unwrap();
                prop_assert!((2.0..=70.0).contains(&bf), "estimate {} out of range", bf);
            }
        }

        /// Property: female estimate is absent iff waist + hip <= neck, otherwise within [5, 70]
        #[test]
        fn prop_female_body_fat_bounds(
            height_cm in 120.0f64..220.0,
            waist in 1.0f64..160.0,
            hip in 1.0f64..160.0,
            neck in 25.0f64..60.0
        ) {
            let bf = estimate_body_fat(height_cm / 100.0, BiologicalSex::Female, Some(waist), Some(neck), Some(hip));
            if waist + hip <= neck {
                prop_assert!(bf.is_none());
            } else {
                prop_assert!(bf.is_some(), "estimate missing");
                let bf = bf.unwrap();
                prop_assert!((5.0..=70.0).contains(&bf), "estimate {} out of range", bf);
            }
        }
    }
}
