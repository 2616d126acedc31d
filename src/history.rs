//! Care History
//!
//! Past care events per plant and the ledger contract the planner reads them
//! through. The planner only ever mutates its own clone of a [`CareHistory`].

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

use crate::needs::{normalize_species, SpeciesNeeds};

/// One recorded care activity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct CareEvent {
    pub plant_id: String,
    pub care_type: String,
    pub date: NaiveDate,
}

impl CareEvent {
    pub fn new(plant_id: impl Into<String>, care_type: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            plant_id: plant_id.into(),
            care_type: care_type.into(),
            date,
        }
    }
}

/// Per-plant view of the care ledger
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CareHistory {
    plant_id: String,
    events: Vec<CareEvent>,
}

impl CareHistory {
    pub fn new(plant_id: impl Into<String>, events: Vec<CareEvent>) -> Self {
        Self {
            plant_id: plant_id.into(),
            events,
        }
    }

    /// Load all events for a plant from the ledger
    pub fn load(ledger: &dyn CareLedger, plant_id: &str) -> Result<Self> {
        let events = ledger.events(plant_id)?;
        if events.is_empty() {
            tracing::debug!("no history found for plant: {}", plant_id);
        }
        Ok(Self::new(plant_id, events))
    }

    pub fn plant_id(&self) -> &str {
        &self.plant_id
    }

    pub fn events(&self) -> &[CareEvent] {
        &self.events
    }

    /// Append an event without any uniqueness check
    pub fn record(&mut self, care_type: &str, date: NaiveDate) {
        self.events.push(CareEvent::new(self.plant_id.clone(), care_type, date));
    }

    /// Ascending, de-duplicated dates for one care type
    pub fn dates(&self, care_type: &str) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .events
            .iter()
            .filter(|e| e.care_type == care_type)
            .map(|e| e.date)
            .collect();
        dates.sort_unstable();
        dates.dedup();
        dates
    }

    pub fn contains(&self, care_type: &str, date: NaiveDate) -> bool {
        self.events.iter().any(|e| e.care_type == care_type && e.date == date)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Binarize history over `[from, to)`
///
/// Entry `i` is `1.0` iff `from + i days` is in `hist`. The result has
/// `(to - from).num_days()` entries (none if `to <= from`).
pub fn dates_to_binary(hist: &[NaiveDate], from: NaiveDate, to: NaiveDate) -> Vec<f64> {
    let seen: FxHashSet<NaiveDate> = hist.iter().copied().collect();
    let n_days = (to - from).num_days().max(0);

    (0..n_days)
        .map(|i| {
            if seen.contains(&(from + Duration::days(i))) {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Read access to persisted care records
///
/// Implemented by the caller's storage layer; the planner never writes
/// through it.
pub trait CareLedger: Send + Sync {
    /// All care events recorded for a plant, any order
    fn events(&self, plant_id: &str) -> Result<Vec<CareEvent>>;

    /// Need document for a species, `None` if unknown
    fn needs(&self, species: &str) -> Result<Option<SpeciesNeeds>>;

    /// Ascending dates on which `care_type` was applied to a plant
    fn history_dates(&self, plant_id: &str, care_type: &str) -> Result<Vec<NaiveDate>> {
        let events = self.events(plant_id)?;
        Ok(CareHistory::new(plant_id, events).dates(care_type))
    }
}

/// In-memory ledger for tests and fixtures
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    events: RwLock<FxHashMap<String, Vec<CareEvent>>>,
    needs: RwLock<FxHashMap<String, SpeciesNeeds>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an event; returns false if `(plant, care_type, date)` already exists
    pub fn insert_event(&self, event: CareEvent) -> bool {
        let mut events = self.events.write().unwrap_or_else(|e| e.into_inner());
        let plant_events = events.entry(event.plant_id.clone()).or_default();
        if plant_events.contains(&event) {
            return false;
        }
        plant_events.push(event);
        true
    }

    pub fn insert_needs(&self, species: &str, needs: SpeciesNeeds) {
        let mut all = self.needs.write().unwrap_or_else(|e| e.into_inner());
        all.insert(normalize_species(species), needs);
    }
}

impl CareLedger for InMemoryLedger {
    fn events(&self, plant_id: &str) -> Result<Vec<CareEvent>> {
        let events = self.events.read().unwrap_or_else(|e| e.into_inner());
        Ok(events.get(plant_id).cloned().unwrap_or_default())
    }

    fn needs(&self, species: &str) -> Result<Option<SpeciesNeeds>> {
        let all = self.needs.read().unwrap_or_else(|e| e.into_inner());
        Ok(all.get(&normalize_species(species)).cloned())
    }
}
