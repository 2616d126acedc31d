//! Temperature weight shared by the water and mist optimisers
//!
//! Compares the centre of the species' temperature range against a
//! recency-weighted estimate of what the plant actually experienced:
//!
//!   diff = optimal - actual
//!   w    = 1 + log10(|diff|)
//!   weight = w      if too cold (diff > 0)
//!          = 1 / w  if too warm (diff < 0)
//!
//! `diff == 0` and vanishing or negative `w` (|diff| <= 0.1) are neutral.

use crate::climate::{mean_weighted_temperature, EnvironmentSnapshot};
use crate::conditions::Conditions;
use crate::needs::SpeciesNeeds;

/// Centre used when a species declares no temperature range (°C)
pub const DEFAULT_OPTIMAL_TEMPERATURE: f64 = 18.0;

/// Below this, `w` is treated as zero
const MIN_WEIGHT: f64 = 1e-6;

/// Midpoint of the species' `air.temperature` range
pub fn optimal_temperature_center(needs: &SpeciesNeeds) -> f64 {
    needs
        .temperature_range()
        .map(|range| range.center())
        .unwrap_or(DEFAULT_OPTIMAL_TEMPERATURE)
}

pub fn temperature_weight(
    needs: &SpeciesNeeds,
    conditions: &Conditions,
    snapshot: &EnvironmentSnapshot,
) -> f64 {
    let optimal = optimal_temperature_center(needs);
    let actual = mean_weighted_temperature(snapshot, conditions.indoor).unwrap_or(optimal);

    weight_from_difference(optimal - actual)
}

pub fn weight_from_difference(diff: f64) -> f64 {
    if diff == 0.0 || !diff.is_finite() {
        return 1.0;
    }

    let w = 1.0 + diff.abs().log10();
    if w < MIN_WEIGHT {
        return 1.0;
    }

    if diff > 0.0 {
        w
    } else {
        1.0 / w
    }
}
