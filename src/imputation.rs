//! History Imputation
//!
//! A window with no care at all says nothing about how often the plant is
//! really cared for. Imputers replace such a window with a plausible one of
//! the same length; windows with any positive entry are returned unchanged.

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Imputer {
    /// Every position set to a fixed value
    Constant(f64),
    /// Bernoulli draw per position with p = need
    NeedProbability,
    /// Bernoulli draw per position with p = need * factor
    FactorScaled(f64),
    /// `need * factor` everywhere except a final forced `1.0`
    TailAdjustment(f64),
}

impl Default for Imputer {
    fn default() -> Self {
        Imputer::Constant(0.0)
    }
}

impl Imputer {
    /// Impute `window` if it is entirely empty
    pub fn impute<R: Rng>(&self, window: Vec<f64>, need: f64, rng: &mut R) -> Vec<f64> {
        if window.iter().any(|&v| v != 0.0) {
            tracing::debug!("skipping imputation");
            return window;
        }

        tracing::debug!("applying {:?} imputation", self);
        let len = window.len();
        match *self {
            Imputer::Constant(value) => vec![value; len],
            Imputer::NeedProbability => bernoulli_window(len, need, rng),
            Imputer::FactorScaled(factor) => bernoulli_window(len, need * factor, rng),
            Imputer::TailAdjustment(factor) => {
                let mut adjusted = vec![need * factor; len];
                if let Some(last) = adjusted.last_mut() {
                    *last = 1.0;
                }
                adjusted
            }
        }
    }
}

/// `len` independent 0/1 draws; `p` is clamped into `[0, 1]`
fn bernoulli_window<R: Rng>(len: usize, p: f64, rng: &mut R) -> Vec<f64> {
    let p = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };
    (0..len)
        .map(|_| if rng.gen_bool(p) { 1.0 } else { 0.0 })
        .collect()
}
