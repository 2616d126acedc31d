//! Misting: temperature and light

use super::CareWeights;
use crate::conditions::Conditions;
use crate::needs::SpeciesNeeds;

pub const DEFAULT_LIGHT_SCORE: f64 = 0.5;

/// Mist more when the plant gets more light than it needs
///
/// A species light score of zero gives no scale.
pub fn apply_light_weight(weights: &mut CareWeights, needs: &SpeciesNeeds, conditions: &Conditions) {
    let need = needs.score("light").unwrap_or(DEFAULT_LIGHT_SCORE);
    let has = conditions.score("light").unwrap_or(DEFAULT_LIGHT_SCORE);

    if need > 0.0 && need < has {
        weights.light *= has / need;
    }
}
