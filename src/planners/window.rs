//! Observation window helpers shared by all strategies

use crate::error::{CareError, Result};

/// Longest window the adaptive strategy will build (ten years)
pub const MAX_ADAPTIVE_LOOKBACK_DAYS: u32 = 3650;

/// Mean of the window rounded to 3 decimals (ties to even), 0 for an empty window
pub fn realized_frequency(window: &[f64]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let mu = window.iter().sum::<f64>() / window.len() as f64;
    (mu * 1000.0).round_ties_even() / 1000.0
}

/// Adaptive window length: `round(1 / need)` days, ties to even
pub fn adaptive_lookback(care_type: &str, need: f64) -> Result<u32> {
    if !(need.is_finite() && need > 0.0) {
        return Err(CareError::NonPositiveNeed {
            care_type: care_type.to_string(),
            need,
        });
    }

    let days = (1.0 / need).round_ties_even();
    if days > MAX_ADAPTIVE_LOOKBACK_DAYS as f64 {
        return Err(CareError::LookbackTooLong {
            care_type: care_type.to_string(),
            need,
            days: days as u64,
        });
    }
    Ok(days as u32)
}

/// Whether the most recent position of the window saw care
pub fn last_bit(window: &[f64]) -> u8 {
    match window.last() {
        Some(&v) if v > 0.0 => 1,
        _ => 0,
    }
}
