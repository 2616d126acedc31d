//! Bayesian decision: care with probability `need - realized frequency`

use rand::Rng;

/// Fixed window for the Bayesian strategy (days)
pub const BAYES_LOOKBACK_DAYS: u32 = 15;

/// `p = clamp(need - mu, 0, 1)`; Bernoulli draw when `0 < p < 1`
pub fn decide<R: Rng>(need: f64, mu: f64, rng: &mut R) -> u8 {
    let p = (need - mu).clamp(0.0, 1.0);
    tracing::debug!(mu, p, "bayes probability");

    if p > 0.0 && p < 1.0 {
        u8::from(rng.gen_bool(p))
    } else {
        p.round() as u8
    }
}
