//! Climate Conditions
//!
//! Recent daily weather for the plant's location, ordered oldest first, plus
//! an indoor temperature estimate derived from the outdoor average.
//!
//! Fetching is the provider's job. [`ClimateCache`] calls it at most once per
//! TTL and never retries; an empty response becomes an empty snapshot, which
//! the optimisers treat as "no adjustment available".

use anyhow::Result;
use chrono::{Local, NaiveDate};
use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::PlannerConfig;
use crate::error::CareError;

/// One day of weather from a provider (missing readings as `None`)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DailyClimate {
    pub date: NaiveDate,
    #[serde(default)]
    pub tavg: Option<f64>,
    #[serde(default)]
    pub tmin: Option<f64>,
    #[serde(default)]
    pub tmax: Option<f64>,
    /// Sunshine duration (minutes)
    #[serde(default)]
    pub tsun: Option<f64>,
}

/// Column-oriented climate series, ascending by date
///
/// Missing readings are stored as NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnvironmentSnapshot {
    pub tavg: Vec<f64>,
    pub tmin: Vec<f64>,
    pub tmax: Vec<f64>,
    pub tsun: Vec<f64>,
    pub indoor_estimate: Vec<f64>,
}

impl EnvironmentSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from provider rows in any order
    pub fn from_daily(mut rows: Vec<DailyClimate>) -> Self {
        rows.sort_by_key(|r| r.date);

        let column = |f: fn(&DailyClimate) -> Option<f64>| -> Vec<f64> {
            rows.iter().map(|r| f(r).unwrap_or(f64::NAN)).collect()
        };

        let tavg = column(|r| r.tavg);
        let indoor_estimate = tavg.iter().map(|&t| estimate_indoor_temperature(t)).collect();

        Self {
            tmin: column(|r| r.tmin),
            tmax: column(|r| r.tmax),
            tsun: column(|r| r.tsun),
            tavg,
            indoor_estimate,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tavg.is_empty()
    }

    /// Temperature series relevant to a plant
    pub fn series(&self, indoor: bool) -> &[f64] {
        if indoor {
            &self.indoor_estimate
        } else {
            &self.tavg
        }
    }
}

/// Map an outdoor daily average to an assumed indoor temperature (°C)
pub fn estimate_indoor_temperature(t: f64) -> f64 {
    if !t.is_finite() {
        f64::NAN
    } else if t < 17.0 {
        19.0
    } else if (25.0..=28.0).contains(&t) {
        21.0
    } else if t > 28.0 {
        22.0
    } else {
        20.0
    }
}

/// `log10` of the 1-based position, so later (more recent) entries weigh more
pub fn recency_weights(len: usize) -> Vec<f64> {
    (1..=len).map(|i| (i as f64).log10()).collect()
}

/// Recency-weighted mean temperature, `None` if there are no readings
///
/// Non-finite readings are dropped before weighting. A single reading has a
/// zero weight sum and is returned as is.
pub fn mean_weighted_temperature(snapshot: &EnvironmentSnapshot, indoor: bool) -> Option<f64> {
    let readings: Vec<f64> = snapshot
        .series(indoor)
        .iter()
        .copied()
        .filter(|t| t.is_finite())
        .collect();

    if readings.is_empty() {
        return None;
    }

    let weights = recency_weights(readings.len());
    let weight_sum: f64 = weights.iter().sum();
    if weight_sum <= 0.0 {
        return Some(readings.iter().sum::<f64>() / readings.len() as f64);
    }

    let weighted: f64 = readings.iter().zip(&weights).map(|(t, w)| t * w).sum();
    Some(weighted / weight_sum)
}

/// Source of daily weather for the plant's location
pub trait ClimateProvider: Send + Sync {
    /// Daily rows covering `days_back` days up to `end`
    fn fetch_daily(&self, end: NaiveDate, days_back: u32) -> Result<Vec<DailyClimate>>;
}

/// Provider that always returns the same rows
#[derive(Debug, Clone, Default)]
pub struct StaticClimate {
    rows: Vec<DailyClimate>,
}

impl StaticClimate {
    pub fn new(rows: Vec<DailyClimate>) -> Self {
        Self { rows }
    }
}

impl ClimateProvider for StaticClimate {
    fn fetch_daily(&self, _end: NaiveDate, _days_back: u32) -> Result<Vec<DailyClimate>> {
        Ok(self.rows.clone())
    }
}

/// Lazily fetched, shared climate snapshot with a TTL
pub struct ClimateCache {
    provider: Arc<dyn ClimateProvider>,
    days_back: u32,
    cache: Cache<(), Arc<EnvironmentSnapshot>>,
}

impl ClimateCache {
    pub fn new(provider: Arc<dyn ClimateProvider>, config: &PlannerConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.climate_cache_ttl())
            .build();
        Self {
            provider,
            days_back: config.climate_days_back,
            cache,
        }
    }

    /// Current snapshot, fetched on first use (one fetch even under contention)
    pub fn snapshot(&self) -> std::result::Result<Arc<EnvironmentSnapshot>, CareError> {
        if let Some(snapshot) = self.cache.get(&()) {
            tracing::debug!("climate data exists, returning existing data");
            return Ok(snapshot);
        }

        self.cache
            .try_get_with((), || -> Result<Arc<EnvironmentSnapshot>> {
                tracing::info!("fetching {} days of climate data", self.days_back);
                let rows = self.provider.fetch_daily(Local::now().date_naive(), self.days_back)?;
                if rows.is_empty() {
                    tracing::warn!("climate data returned empty response");
                }
                Ok(Arc::new(EnvironmentSnapshot::from_daily(rows)))
            })
            .map_err(|e| CareError::ClimateUnavailable(format!("{:#}", e)))
    }

    /// Forget the cached snapshot
    pub fn refresh(&self) {
        self.cache.invalidate_all();
    }
}
