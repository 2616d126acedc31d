//! Planner configuration
//!
//! Defaults match the planner's documented behaviour; a JSON file or
//! environment variables can override them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::CareError;

/// Longest cache TTL accepted (one year)
pub const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 3600;

/// Tunables shared by planners, optimisers and caches
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Window length for the fixed-lookback (`naive`) strategy (days)
    pub lookback_days: u32,

    /// Baseline need used when a species has no entry for a care type
    pub default_need: f64,

    /// Scale applied to the need when the Bayesian planner imputes history
    pub bayes_imputation_factor: f64,

    /// Default planning horizon (days)
    pub horizon_days: u32,

    /// How many days of climate history to request from the provider
    pub climate_days_back: u32,

    pub needs_cache_ttl_secs: u64,
    pub needs_cache_capacity: u64,
    pub climate_cache_ttl_secs: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            lookback_days: 15,
            default_need: 0.05,
            bayes_imputation_factor: 0.8,
            horizon_days: 10,
            climate_days_back: 15,
            needs_cache_ttl_secs: 3600,
            needs_cache_capacity: 1024,
            climate_cache_ttl_secs: 6 * 3600,
        }
    }
}

impl PlannerConfig {
    /// Load configuration from a JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read planner config: {:?}", path))?;

        let config: PlannerConfig = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse planner config JSON")?;

        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with `CARE_*` environment variables
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = env_parse::<u32>("CARE_LOOKBACK_DAYS") {
            config.lookback_days = v;
        }
        if let Some(v) = env_parse::<f64>("CARE_DEFAULT_NEED") {
            config.default_need = v;
        }
        if let Some(v) = env_parse::<u32>("CARE_HORIZON_DAYS") {
            config.horizon_days = v;
        }
        if let Some(v) = env_parse::<u32>("CARE_CLIMATE_DAYS_BACK") {
            config.climate_days_back = v;
        }

        config
    }

    /// Needs cache TTL, capped at [`MAX_CACHE_TTL_SECS`]
    pub fn needs_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.needs_cache_ttl_secs.min(MAX_CACHE_TTL_SECS))
    }

    /// Climate cache TTL, capped at [`MAX_CACHE_TTL_SECS`]
    pub fn climate_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.climate_cache_ttl_secs.min(MAX_CACHE_TTL_SECS))
    }

    pub fn validate(&self) -> std::result::Result<(), CareError> {
        if !(self.default_need > 0.0 && self.default_need <= 1.0) {
            return Err(CareError::InvalidConfig {
                reason: format!("default_need {} is outside (0, 1]", self.default_need),
            });
        }
        if self.lookback_days == 0 {
            return Err(CareError::InvalidConfig {
                reason: "lookback_days must be at least 1".to_string(),
            });
        }
        for (name, secs) in [
            ("needs_cache_ttl_secs", self.needs_cache_ttl_secs),
            ("climate_cache_ttl_secs", self.climate_cache_ttl_secs),
        ] {
            if secs > MAX_CACHE_TTL_SECS {
                return Err(CareError::InvalidConfig {
                    reason: format!("{} {} exceeds {}", name, secs, MAX_CACHE_TTL_SECS),
                });
            }
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PlannerConfig::default();
        assert_eq!(config.lookback_days, 15);
        assert_eq!(config.default_need, 0.05);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: PlannerConfig = serde_json::from_str(r#"{"lookback_days": 20}"#).unwrap();
        assert_eq!(config.lookback_days, 20);
        assert_eq!(config.horizon_days, 10);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("planner_config_{}.json", std::process::id()));
        fs::write(&path, r#"{"default_need": 0.1, "horizon_days": 7}"#).unwrap();

        let config = PlannerConfig::load(&path).unwrap();
        assert_eq!(config.default_need, 0.1);
        assert_eq!(config.horizon_days, 7);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_rejects_zero_default_need() {
        let config = PlannerConfig { default_need: 0.0, ..Default::default() };
        assert!(matches!(config.validate(), Err(CareError::InvalidConfig { .. })));
    }

    #[test]
    fn test_rejects_zero_lookback() {
        let config = PlannerConfig { lookback_days: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_cache_ttl() {
        let config: PlannerConfig =
            serde_json::from_str(r#"{"climate_cache_ttl_secs": 18446744073709551615}"#).unwrap();
        assert!(matches!(config.validate(), Err(CareError::InvalidConfig { .. })));
        assert_eq!(config.climate_cache_ttl(), Duration::from_secs(MAX_CACHE_TTL_SECS));

        let config = PlannerConfig { needs_cache_ttl_secs: MAX_CACHE_TTL_SECS + 1, ..Default::default() };
        assert!(config.validate().is_err());

        let config = PlannerConfig { needs_cache_ttl_secs: MAX_CACHE_TTL_SECS, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
