//! Repertoire
//!
//! The set of plants a user cares for. Planning the whole repertoire runs one
//! independent simulation per plant in parallel (Rayon); plants share only
//! read-only needs and climate data.

use rayon::prelude::*;
use std::sync::Arc;

use crate::climate::EnvironmentSnapshot;
use crate::conditions::Conditions;
use crate::error::{CareError, Result};
use crate::history::CareLedger;
use crate::needs::NeedsCache;
use crate::planners::{CarePlan, CarePlanner, PlanRequest};
use crate::plant::PlantUnit;

#[derive(Debug, Clone, Default)]
pub struct Repertoire {
    plants: Vec<PlantUnit>,
}

impl Repertoire {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new plant under a generated id
    pub fn add(
        &mut self,
        name: &str,
        species: &str,
        conditions: Conditions,
        needs_cache: &NeedsCache,
        ledger: &dyn CareLedger,
    ) -> Result<&PlantUnit> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let plant = PlantUnit::load(&id, name, species, conditions, needs_cache, ledger)?;
        tracing::info!("added '{}' ({}) to repertoire as {}", name, species, id);
        Ok(self.insert(plant))
    }

    /// Insert an already assembled plant, replacing any plant with the same id
    pub fn insert(&mut self, plant: PlantUnit) -> &PlantUnit {
        let idx = match self.plants.iter().position(|p| p.id == plant.id) {
            Some(idx) => {
                self.plants[idx] = plant;
                idx
            }
            None => {
                self.plants.push(plant);
                self.plants.len() - 1
            }
        };
        &self.plants[idx]
    }

    pub fn get(&self, id: &str) -> Result<&PlantUnit> {
        self.plants
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CareError::PlantNotFound { id: id.to_string() })
    }

    pub fn remove(&mut self, id: &str) -> Result<PlantUnit> {
        let idx = self
            .plants
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CareError::PlantNotFound { id: id.to_string() })?;
        Ok(self.plants.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlantUnit> {
        self.plants.iter()
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    /// Plan `care_type` for every plant, in repertoire order
    ///
    /// A failing plant does not stop the others; its error is returned in
    /// its slot.
    pub fn plan_all(
        &self,
        planner: &CarePlanner,
        care_type: &str,
        climate: &Arc<EnvironmentSnapshot>,
        request: &PlanRequest,
    ) -> Vec<(String, Result<CarePlan>)> {
        tracing::info!("planning '{}' for {} plants", care_type, self.plants.len());

        self.plants
            .par_iter()
            .map(|plant| {
                let plan = planner.plan(plant, care_type, climate, request);
                if let Err(e) = &plan {
                    tracing::warn!("skipping plant {}: {}", plant.id, e);
                }
                (plant.id.clone(), plan)
            })
            .collect()
    }
}
