//! Care Planner
//!
//! Forward-simulating care scheduler for house plants. Given a plant's care
//! history, its species' needs, its local conditions and recent climate, the
//! planners decide day by day whether a care task (water, mist, ...) is due
//! over a planning horizon.
//!
//! Layout:
//! - `history`, `needs`, `conditions`, `climate`: input data and the caches in front of it
//! - `optimisers/`: climate- and condition-aware rescaling of a baseline need
//! - `imputation`: synthetic history for empty windows
//! - `planners/`: the `bayes`, `naive` and `dynamic` strategies
//! - `plant`, `repertoire`: plants and parallel planning across them

pub mod climate;
pub mod conditions;
pub mod config;
pub mod error;
pub mod history;
pub mod imputation;
pub mod needs;
pub mod optimisers;
pub mod planners;
pub mod plant;
pub mod repertoire;

// Re-export commonly used types
pub use climate::{ClimateCache, ClimateProvider, DailyClimate, EnvironmentSnapshot, StaticClimate};
pub use conditions::{Conditions, Score};
pub use config::PlannerConfig;
pub use error::{CareError, Result};
pub use history::{dates_to_binary, CareEvent, CareHistory, CareLedger, InMemoryLedger};
pub use imputation::Imputer;
pub use needs::{CareNeed, NeedsCache, SpeciesNeeds};
pub use optimisers::{CareOptimiser, CareWeights, OptimiserKind};
pub use planners::{CarePlan, CarePlanner, PlanRequest, PlannedDay, Strategy};
pub use plant::PlantUnit;
pub use repertoire::Repertoire;
