//! Watering: temperature and drainage

use super::CareWeights;
use crate::conditions::Conditions;
use crate::needs::SpeciesNeeds;

/// Score assumed when neither side declares drainage
pub const DEFAULT_DRAINAGE_SCORE: f64 = 0.3;

/// Clear the drainage weight when the pot drains well enough
///
/// Insufficient drainage leaves the running weight untouched; nothing
/// penalises it yet (a re-pot advice would belong here).
pub fn apply_drainage_weight(weights: &mut CareWeights, needs: &SpeciesNeeds, conditions: &Conditions) {
    let has = conditions.score("drainage").unwrap_or(DEFAULT_DRAINAGE_SCORE);
    let need = needs.score("drainage").unwrap_or(DEFAULT_DRAINAGE_SCORE);

    if has >= need {
        tracing::debug!("setting drainage weight to 1.0");
        weights.drainage = 1.0;
    }
}
