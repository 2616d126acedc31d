//! Error types for the care planner.
//!
//! Core operations return [`CareError`]. Collaborators (ledger, climate
//! provider, file loaders) use `anyhow` and are mapped into `CareError`
//! where they cross into the planner.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CareError {
    #[error("no planner found with name: {name}")]
    UnknownPlanner { name: String },

    #[error("need frequency {freq} for '{care_type}' is outside (0, 1]")]
    InvalidFrequency { care_type: String, freq: f64 },

    #[error("adjusted need {need} for '{care_type}' must be positive to size a lookback window")]
    NonPositiveNeed { care_type: String, need: f64 },

    #[error("adjusted need {need} for '{care_type}' implies a {days}-day lookback window")]
    LookbackTooLong { care_type: String, need: f64, days: u64 },

    #[error("condition score '{name}' = {score} is outside [0, 1]")]
    ScoreOutOfRange { name: String, score: f64 },

    #[error("no matching plant id found in repertoire: {id}")]
    PlantNotFound { id: String },

    #[error("no care needs recorded for species: {species}")]
    SpeciesNeedsMissing { species: String },

    #[error("invalid planner configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("care ledger error: {0}")]
    Ledger(String),

    #[error("climate data unavailable: {0}")]
    ClimateUnavailable(String),
}

pub type Result<T> = std::result::Result<T, CareError>;
