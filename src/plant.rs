//! Plant Unit
//!
//! One cared-for plant: identity, conditions, its species' needs and its
//! care history. Cloning a plant is how planners get a private simulation
//! copy; needs are immutable and shared.

use std::sync::Arc;

use crate::conditions::Conditions;
use crate::error::{CareError, Result};
use crate::history::{CareHistory, CareLedger};
use crate::needs::{NeedsCache, SpeciesNeeds};

#[derive(Debug, Clone)]
pub struct PlantUnit {
    pub id: String,
    pub name: String,
    pub species: String,
    pub conditions: Conditions,
    pub needs: Arc<SpeciesNeeds>,
    pub history: CareHistory,
}

impl PlantUnit {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        species: impl Into<String>,
        conditions: Conditions,
        needs: Arc<SpeciesNeeds>,
        history: CareHistory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            species: species.into(),
            conditions,
            needs,
            history,
        }
    }

    /// Assemble a plant from the needs cache and the care ledger
    pub fn load(
        id: &str,
        name: &str,
        species: &str,
        conditions: Conditions,
        needs_cache: &NeedsCache,
        ledger: &dyn CareLedger,
    ) -> Result<Self> {
        conditions.validate()?;
        let needs = needs_cache.get(species)?;
        let history = CareHistory::load(ledger, id).map_err(|e| CareError::Ledger(format!("{:#}", e)))?;

        Ok(Self::new(id, name, species, conditions, needs, history))
    }
}
