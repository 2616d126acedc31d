//! Care Need Optimisers
//!
//! Rescale a species' baseline need frequency for one care type using the
//! plant's conditions and recent climate. The result is not bounded to
//! `[0, 1]`; planners clamp or compare it as they need.
//!
//! Weights (all start at 1.0):
//! - temperature: optimal vs. recency-weighted actual temperature
//! - daylight hours: reserved, always 1.0
//! - light: misting only, scaled up for excess light
//! - drainage: watering only, cleared when drainage is sufficient
//!
//! Care types without an optimiser pass the frequency through unchanged.

pub mod mist;
pub mod temperature;
pub mod water;

pub use temperature::{optimal_temperature_center, temperature_weight};

use serde::Serialize;

use crate::climate::EnvironmentSnapshot;
use crate::conditions::Conditions;
use crate::needs::SpeciesNeeds;

/// Multipliers applied to a baseline frequency
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CareWeights {
    pub temperature: f64,
    pub daylight_hours: f64,
    pub light: f64,
    pub drainage: f64,
}

impl Default for CareWeights {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            daylight_hours: 1.0,
            light: 1.0,
            drainage: 1.0,
        }
    }
}

impl CareWeights {
    pub fn apply(&self, freq: f64) -> f64 {
        freq * self.temperature * self.drainage * self.light * self.daylight_hours
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptimiserKind {
    Water,
    Mist,
    NoOp,
}

impl OptimiserKind {
    pub fn for_care_type(care_type: &str) -> Self {
        match care_type {
            "water" => OptimiserKind::Water,
            "mist" => OptimiserKind::Mist,
            _ => OptimiserKind::NoOp,
        }
    }
}

/// Stateful optimiser for one care type
///
/// Weights are running values: each `opt` call updates them from the inputs
/// and leaves them inspectable through [`CareOptimiser::weights`].
#[derive(Debug, Clone)]
pub struct CareOptimiser {
    kind: OptimiserKind,
    weights: CareWeights,
}

impl CareOptimiser {
    pub fn for_care_type(care_type: &str) -> Self {
        let kind = OptimiserKind::for_care_type(care_type);
        if kind == OptimiserKind::NoOp {
            tracing::debug!("no optimiser for care type '{}', returning frequency directly", care_type);
        }
        Self {
            kind,
            weights: CareWeights::default(),
        }
    }

    /// Seed the running weights
    pub fn with_weights(mut self, weights: CareWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn kind(&self) -> OptimiserKind {
        self.kind
    }

    pub fn weights(&self) -> CareWeights {
        self.weights
    }

    /// Adjusted need frequency
    pub fn opt(
        &mut self,
        freq: f64,
        needs: &SpeciesNeeds,
        conditions: &Conditions,
        snapshot: &EnvironmentSnapshot,
    ) -> f64 {
        match self.kind {
            OptimiserKind::NoOp => return freq,
            OptimiserKind::Water => {
                self.weights.temperature = temperature_weight(needs, conditions, snapshot);
                water::apply_drainage_weight(&mut self.weights, needs, conditions);
            }
            OptimiserKind::Mist => {
                self.weights.temperature = temperature_weight(needs, conditions, snapshot);
                mist::apply_light_weight(&mut self.weights, needs, conditions);
            }
        }

        tracing::debug!(
            freq,
            temperature = self.weights.temperature,
            drainage = self.weights.drainage,
            light = self.weights.light,
            daylight_hours = self.weights.daylight_hours,
            "{:?} optimiser weights",
            self.kind
        );

        self.weights.apply(freq)
    }
}
