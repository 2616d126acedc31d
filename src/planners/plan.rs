//! Plan requests and results

use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::sync::Arc;

use crate::climate::{ClimateCache, EnvironmentSnapshot};
use crate::config::PlannerConfig;
use crate::error::Result;

/// Parameters of one `plan` call
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    /// First planned day is the day after this; defaults to today
    pub start_date: Option<NaiveDate>,
    pub n_days: u32,
    pub optimise: bool,
    pub impute: bool,
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            start_date: None,
            n_days: 10,
            optimise: true,
            impute: false,
        }
    }
}

impl PlanRequest {
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            n_days: config.horizon_days,
            ..Default::default()
        }
    }

    pub fn starting(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn days(mut self, n_days: u32) -> Self {
        self.n_days = n_days;
        self
    }

    pub fn optimise(mut self, optimise: bool) -> Self {
        self.optimise = optimise;
        self
    }

    pub fn impute(mut self, impute: bool) -> Self {
        self.impute = impute;
        self
    }

    pub fn resolved_start(&self) -> NaiveDate {
        self.start_date.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Climate needed for this request: only fetched when optimising
    pub fn climate(&self, cache: &ClimateCache) -> Result<Arc<EnvironmentSnapshot>> {
        if self.optimise {
            cache.snapshot()
        } else {
            Ok(Arc::new(EnvironmentSnapshot::empty()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlannedDay {
    pub date: NaiveDate,
    /// 1 = care on this day
    pub decision: u8,
}

/// Day-by-day schedule for one plant and care type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarePlan {
    pub plant_id: String,
    pub care_type: String,
    pub strategy: String,
    pub days: Vec<PlannedDay>,
}

impl CarePlan {
    pub fn decisions(&self) -> Vec<u8> {
        self.days.iter().map(|d| d.decision).collect()
    }

    /// Dates on which care is due
    pub fn due_dates(&self) -> Vec<NaiveDate> {
        self.days
            .iter()
            .filter(|d| d.decision == 1)
            .map(|d| d.date)
            .collect()
    }
}
