//! Wellness Metrics WASM Module
//!
//! WebAssembly bindings the page calls with raw form values. Numbers read
//! from empty inputs arrive as `NaN` and are treated as absent where the
//! field is optional. Every call returns a JSON string: a result view or
//! `{"error": {...}}`.

mod storage;
mod views;

use chrono::Utc;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wellness_metrics_shared::{
    ActivityLevel, BiologicalSex, HistoryConfig, HistoryEntry, HistoryLog, HistoryStore, KeyValueStore,
    Measurement, PreferencesConfig, PreferencesStore, Theme, UnitSystem,
};

pub use storage::{BrowserStorage, JsStorage};
pub use views::{ActivityLevelView, BmiView, BmrView, ErrorResponse, HistoryItemView};

use views::to_json;

fn optional(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

fn parse_sex(sex: &str) -> Result<BiologicalSex, ErrorResponse> {
    sex.parse()
        .map_err(|msg| ErrorResponse::invalid_choice("sex", msg))
}

/// Build a measurement from the BMI form
#[allow(clippy::too_many_arguments)]
fn bmi_measurement(
    system: &str,
    height: f64,
    inches: f64,
    weight: f64,
    age: f64,
    sex: &str,
    waist: f64,
    neck: f64,
    hip: f64,
) -> Result<Measurement, ErrorResponse> {
    let system: UnitSystem = system
        .parse()
        .map_err(|msg| ErrorResponse::invalid_choice("system", msg))?;

    Ok(Measurement {
        system,
        height_value: height,
        height_inches: optional(inches),
        weight_value: weight,
        age_years: age,
        sex: parse_sex(sex)?,
        waist_cm: optional(waist),
        neck_cm: optional(neck),
        hip_cm: optional(hip),
    })
}

// ============================================================================
// Stateless API
// ============================================================================

fn bmi_view(measurement: &Measurement) -> Result<BmiView, ErrorResponse> {
    let result = wellness_metrics_shared::compute_bmi(measurement)?;
    Ok(BmiView::new(measurement, &result))
}

fn bmr_view(measurement: &Measurement, activity: f64) -> Result<BmrView, ErrorResponse> {
    let result = wellness_metrics_shared::compute_bmr(measurement, activity)?;
    Ok(BmrView::from(&result))
}

fn respond<T: serde::Serialize>(result: Result<T, ErrorResponse>) -> String {
    match result {
        Ok(view) => to_json(&view),
        Err(err) => to_json(&err),
    }
}

/// Calculate BMI, ideal weight range and (when circumferences are given)
/// a body fat estimate.
///
/// `system` is `"metric"` (height in cm, weight in kg) or `"imperial"`
/// (height in feet plus `inches`, weight in lbs).
#[allow(clippy::too_many_arguments)]
#[wasm_bindgen]
pub fn compute_bmi(
    system: &str,
    height: f64,
    inches: f64,
    weight: f64,
    age: f64,
    sex: &str,
    waist: f64,
    neck: f64,
    hip: f64,
) -> String {
    respond(
        bmi_measurement(system, height, inches, weight, age, sex, waist, neck, hip)
            .and_then(|m| bmi_view(&m)),
    )
}

/// Calculate BMR and daily needs from metric inputs
#[wasm_bindgen]
pub fn compute_bmr(
    height_cm: f64,
    weight_kg: f64,
    age: f64,
    sex: &str,
    activity_multiplier: f64,
) -> String {
    respond(parse_sex(sex).and_then(|sex| {
        bmr_view(
            &Measurement::metric(height_cm, weight_kg, age, sex),
            activity_multiplier,
        )
    }))
}

/// Activity presets, least active first
#[wasm_bindgen]
pub fn activity_levels() -> String {
    let levels: Vec<ActivityLevelView> = ActivityLevel::ALL
        .into_iter()
        .map(ActivityLevelView::from)
        .collect();
    to_json(&levels)
}

/// Label for a body fat percentage; empty string for an unknown sex
#[wasm_bindgen]
pub fn body_fat_descriptor(percent: f64, sex: &str) -> String {
    match sex.parse::<BiologicalSex>() {
        Ok(sex) => wellness_metrics_shared::body_fat_descriptor(percent, sex).to_string(),
        Err(_) => String::new(),
    }
}

/// Pick a wellness tip from a uniform roll, e.g. `Math.random()`
#[wasm_bindgen]
pub fn wellness_tip(roll: f64) -> String {
    wellness_metrics_shared::tip_for_roll(roll).to_string()
}

// ============================================================================
// History
// ============================================================================

fn history_json(log: &HistoryLog) -> String {
    let items: Vec<HistoryItemView<'_>> = log.iter().map(HistoryItemView::from).collect();
    to_json(&items)
}

#[allow(clippy::too_many_arguments)]
fn record_bmi_into<S: KeyValueStore>(
    store: &mut HistoryStore<S>,
    system: &str,
    height: f64,
    inches: f64,
    weight: f64,
    age: f64,
    sex: &str,
    waist: f64,
    neck: f64,
    hip: f64,
) -> String {
    respond(
        bmi_measurement(system, height, inches, weight, age, sex, waist, neck, hip).and_then(
            |m| {
                let result = wellness_metrics_shared::compute_bmi(&m)?;
                store.record(HistoryEntry::from_bmi(&m, &result, Utc::now()));
                Ok(BmiView::new(&m, &result))
            },
        ),
    )
}

fn record_bmr_into<S: KeyValueStore>(
    store: &mut HistoryStore<S>,
    height_cm: f64,
    weight_kg: f64,
    age: f64,
    sex: &str,
    activity_multiplier: f64,
) -> String {
    respond(parse_sex(sex).and_then(|sex| {
        let m = Measurement::metric(height_cm, weight_kg, age, sex);
        let result = wellness_metrics_shared::compute_bmr(&m, activity_multiplier)?;
        store.record(HistoryEntry::from_bmr(&m, &result, Utc::now()));
        Ok(BmrView::from(&result))
    }))
}

/// Calculation history persisted in browser storage
#[wasm_bindgen]
pub struct WellnessHistory {
    store: HistoryStore<BrowserStorage>,
}

#[wasm_bindgen]
impl WellnessHistory {
    /// Load history from `storage` (normally `window.localStorage`)
    #[wasm_bindgen(constructor)]
    pub fn new(storage: JsStorage, capacity: usize) -> WellnessHistory {
        let config = HistoryConfig::with_capacity(capacity);
        Self {
            store: HistoryStore::new(BrowserStorage::new(storage), &config),
        }
    }

    /// Entries, newest first, each with `primary`/`secondary` display lines
    pub fn entries_json(&self) -> String {
        history_json(self.store.log())
    }

    pub fn len(&self) -> usize {
        self.store.log().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.log().is_empty()
    }

    /// Compute BMI and record it on success. Same arguments as [`compute_bmi`].
    #[allow(clippy::too_many_arguments)]
    pub fn record_bmi(
        &mut self,
        system: &str,
        height: f64,
        inches: f64,
        weight: f64,
        age: f64,
        sex: &str,
        waist: f64,
        neck: f64,
        hip: f64,
    ) -> String {
        record_bmi_into(
            &mut self.store,
            system,
            height,
            inches,
            weight,
            age,
            sex,
            waist,
            neck,
            hip,
        )
    }

    /// Compute BMR and record it on success. Same arguments as [`compute_bmr`].
    pub fn record_bmr(
        &mut self,
        height_cm: f64,
        weight_kg: f64,
        age: f64,
        sex: &str,
        activity_multiplier: f64,
    ) -> String {
        record_bmr_into(
            &mut self.store,
            height_cm,
            weight_kg,
            age,
            sex,
            activity_multiplier,
        )
    }

    /// Clear history; returns the (empty) entry list
    pub fn clear(&mut self) -> String {
        history_json(self.store.clear())
    }
}

// ============================================================================
// Preferences
// ============================================================================

fn theme_name(theme: Theme) -> String {
    match theme {
        Theme::Light => "light".to_string(),
        Theme::Dark => "dark".to_string(),
    }
}

/// Theme and tips toggle persisted in browser storage
#[wasm_bindgen]
pub struct WellnessPreferences {
    store: PreferencesStore<BrowserStorage>,
}

#[wasm_bindgen]
impl WellnessPreferences {
    #[wasm_bindgen(constructor)]
    pub fn new(storage: JsStorage) -> WellnessPreferences {
        Self {
            store: PreferencesStore::new(BrowserStorage::new(storage), &PreferencesConfig::default()),
        }
    }

    pub fn theme(&self) -> String {
        theme_name(self.store.current().theme)
    }

    /// Set `"light"` or `"dark"`; anything else is ignored
    pub fn set_theme(&mut self, theme: &str) -> String {
        match theme {
            "light" => {
                self.store.set_theme(Theme::Light);
            }
            "dark" => {
                self.store.set_theme(Theme::Dark);
            }
            other => warn!(theme = other, "Ignoring unknown theme"),
        }
        self.theme()
    }

    pub fn tips_enabled(&self) -> bool {
        self.store.current().tips_enabled
    }

    pub fn set_tips_enabled(&mut self, enabled: bool) {
        self.store.set_tips_enabled(enabled);
    }

    /// Tip for a uniform roll, or `undefined` when tips are off
    pub fn tip(&self, roll: f64) -> Option<String> {
        let mut from_roll = |count: usize| {
            let roll = if roll.is_finite() { roll.clamp(0.0, 1.0) } else { 0.0 };
            (roll * count as f64).floor() as usize
        };
        wellness_metrics_shared::pick_tip(&self.store.current(), &mut from_roll)
            .map(str::to_string)
    }
}
