//! Species Care Needs
//!
//! Need documents are keyed by care type (`water`, `mist`, ...) or by an
//! environmental aspect (`light`, `drainage`, `air`). Loaded through a
//! [`CareLedger`] and held in a [`NeedsCache`] with an explicit TTL.

use anyhow::Context;
use moka::sync::Cache;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::PlannerConfig;
use crate::error::{CareError, Result};
use crate::history::CareLedger;

/// Acceptable temperature range (°C)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
}

impl TemperatureRange {
    pub fn center(&self) -> f64 {
        self.min + (self.max - self.min) / 2.0
    }
}

/// A single need entry
///
/// Care types carry `freq` (daily probability) and optionally `amount`/`type`;
/// aspects carry `score`, `direct` or `temperature`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CareNeed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    #[serde(rename = "type", alias = "watering_type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    /// Direct light tolerated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<TemperatureRange>,

    #[serde(flatten)]
    pub extra: FxHashMap<String, serde_json::Value>,
}

/// Need document for one species
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SpeciesNeeds {
    entries: FxHashMap<String, CareNeed>,
}

impl SpeciesNeeds {
    pub fn new(entries: FxHashMap<String, CareNeed>) -> Self {
        Self { entries }
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).with_context(|| "Failed to parse species needs JSON")
    }

    pub fn get(&self, key: &str) -> Option<&CareNeed> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, need: CareNeed) {
        self.entries.insert(key.into(), need);
    }

    /// Baseline frequency for a care type, if the species declares one
    pub fn freq(&self, care_type: &str) -> Option<f64> {
        self.get(care_type).and_then(|n| n.freq)
    }

    /// Score of an aspect such as `light` or `drainage`
    pub fn score(&self, aspect: &str) -> Option<f64> {
        self.get(aspect).and_then(|n| n.score)
    }

    /// Temperature range declared under `air`
    pub fn temperature_range(&self) -> Option<TemperatureRange> {
        self.get("air").and_then(|n| n.temperature)
    }

    /// Baseline need for planning: declared `freq` or `default`
    ///
    /// A declared frequency outside `(0, 1]` is rejected.
    pub fn baseline_need(&self, care_type: &str, default: f64) -> Result<f64> {
        match self.freq(care_type) {
            None => Ok(default),
            Some(freq) if freq > 0.0 && freq <= 1.0 => Ok(freq),
            Some(freq) => Err(CareError::InvalidFrequency {
                care_type: care_type.to_string(),
                freq,
            }),
        }
    }
}

/// Normalise a species name for lookups: lower-case, trimmed, no punctuation
pub fn normalize_species(species: &str) -> String {
    species
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect()
}

/// Species needs repository with a bounded, expiring cache
pub struct NeedsCache {
    ledger: Arc<dyn CareLedger>,
    cache: Cache<String, Arc<SpeciesNeeds>>,
}

impl NeedsCache {
    pub fn new(ledger: Arc<dyn CareLedger>, config: &PlannerConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.needs_cache_capacity)
            .time_to_live(config.needs_cache_ttl())
            .build();
        Self { ledger, cache }
    }

    /// Needs for a species, loading from the ledger at most once per TTL
    pub fn get(&self, species: &str) -> Result<Arc<SpeciesNeeds>> {
        let key = normalize_species(species);
        if let Some(needs) = self.cache.get(&key) {
            tracing::debug!("care needs for '{}' already loaded", key);
            return Ok(needs);
        }

        self.cache
            .try_get_with(key.clone(), || -> Result<Arc<SpeciesNeeds>> {
                tracing::info!("loading care needs for '{}'", key);
                match self.ledger.needs(&key) {
                    Ok(Some(needs)) => Ok(Arc::new(needs)),
                    Ok(None) => Err(CareError::SpeciesNeedsMissing { species: key.clone() }),
                    Err(e) => Err(CareError::Ledger(format!("{:#}", e))),
                }
            })
            .map_err(|e| match e.as_ref() {
                CareError::SpeciesNeedsMissing { species } => CareError::SpeciesNeedsMissing {
                    species: species.clone(),
                },
                CareError::Ledger(msg) => CareError::Ledger(msg.clone()),
                other => CareError::Ledger(other.to_string()),
            })
    }

    /// Drop one species so the next `get` reloads it
    pub fn refresh(&self, species: &str) {
        self.cache.invalidate(&normalize_species(species));
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}
