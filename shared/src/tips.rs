//! Wellness tips shown under a BMI result
//!
//! Selection needs randomness, which is injected through [`TipSelector`]
//! so the rest of the crate stays deterministic.

use crate::preferences::Preferences;

pub const WELLNESS_TIPS: [&str; 5] = [
    "Keep a water bottle handy—hydration boosts focus and energy.",
    "Aim for colorful plates. Veggies and fruits love photobombing your meals.",
    "Micro-breaks during desk time keep your spine and sanity aligned.",
    "Sleep is a performance enhancer. Guard those 7–9 hours like treasure.",
    "Consistency wins over perfection. Tiny habits stack up.",
];

/// Source of tip indices
pub trait TipSelector {
    /// Pick an index in `0..count`. Out-of-range picks are clamped.
    fn select(&mut self, count: usize) -> usize;
}

impl<F: FnMut(usize) -> usize> TipSelector for F {
    fn select(&mut self, count: usize) -> usize {
        self(count)
    }
}

/// Pick a tip, or `None` when the user turned tips off
pub fn pick_tip(preferences: &Preferences, selector: &mut impl TipSelector) -> Option<&'static str> {
    if !preferences.tips_enabled {
        return None;
    }
    let idx = selector.select(WELLNESS_TIPS.len());
    Some(WELLNESS_TIPS[idx.min(WELLNESS_TIPS.len() - 1)])
}

/// Map a uniform roll in `[0, 1)` (e.g. `Math.random()`) to a tip
pub fn tip_for_roll(roll: f64) -> &'static str {
    let roll = if roll.is_finite() { roll.clamp(0.0, 1.0) } else { 0.0 };
    let idx = (roll * WELLNESS_TIPS.len() as f64).floor() as usize;
    WELLNESS_TIPS[idx.min(WELLNESS_TIPS.len() - 1)]
}
