//! Plant Conditions
//!
//! Where a plant lives: indoor flag plus `[0, 1]` scores for light,
//! drainage, isolation and so on.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{CareError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Score {
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Conditions {
    #[serde(default = "default_indoor")]
    pub indoor: bool,

    #[serde(flatten)]
    pub scores: FxHashMap<String, Score>,
}

fn default_indoor() -> bool {
    true
}

impl Default for Conditions {
    fn default() -> Self {
        Self {
            indoor: true,
            scores: FxHashMap::default(),
        }
    }
}

impl Conditions {
    pub fn new(indoor: bool) -> Self {
        Self {
            indoor,
            ..Default::default()
        }
    }

    /// Builder-style score setter
    pub fn with_score(mut self, name: impl Into<String>, score: f64) -> Self {
        self.scores.insert(name.into(), Score { score });
        self
    }

    pub fn score(&self, name: &str) -> Option<f64> {
        self.scores.get(name).map(|s| s.score)
    }

    /// Every score must lie in `[0, 1]`
    pub fn validate(&self) -> Result<()> {
        for (name, s) in &self.scores {
            if !(0.0..=1.0).contains(&s.score) {
                return Err(CareError::ScoreOutOfRange {
                    name: name.clone(),
                    score: s.score,
                });
            }
        }
        Ok(())
    }
}
