//! Care Planners
//!
//! Forward-simulate a plant's care for the next N days. Each day:
//!
//! 1. baseline need = species `freq` for the care type (default from config)
//! 2. optionally rescale it with the care type's optimiser
//! 3. binarize the history over the strategy's lookback, ending the day before
//! 4. optionally impute an empty window (never on the first simulated day)
//! 5. realized frequency `mu` = window mean, 3 decimals
//! 6. decide with the strategy; a "care" decision is appended to the
//!    simulation copy's history so later days see it
//!
//! Strategies:
//! - `bayes`: 15-day window, Bernoulli draw with p = clamp(need - mu, 0, 1)
//! - `naive`: fixed window, care iff mu < need (ties alternate)
//! - `dynamic`: window of round(1 / need) days, same rule as `naive`

pub mod bayes;
pub mod lookback;
pub mod plan;
pub mod window;

pub use plan::{CarePlan, PlanRequest, PlannedDay};

use chrono::{Duration, NaiveDate};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

use crate::climate::EnvironmentSnapshot;
use crate::config::PlannerConfig;
use crate::error::{CareError, Result};
use crate::history::dates_to_binary;
use crate::imputation::Imputer;
use crate::optimisers::CareOptimiser;
use crate::plant::PlantUnit;

/// Default window of the fixed-lookback strategy (days)
pub const DEFAULT_LOOKBACK_DAYS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Bayesian,
    FixedLookback { lookback_days: u32 },
    AdaptiveLookback,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Bayesian => "bayes",
            Strategy::FixedLookback { .. } => "naive",
            Strategy::AdaptiveLookback => "dynamic",
        }
    }

    pub fn all_names() -> &'static [&'static str] {
        &["bayes", "naive", "dynamic"]
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = CareError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "bayes" => Ok(Strategy::Bayesian),
            "naive" => Ok(Strategy::FixedLookback {
                lookback_days: DEFAULT_LOOKBACK_DAYS,
            }),
            "dynamic" => Ok(Strategy::AdaptiveLookback),
            _ => Err(CareError::UnknownPlanner {
                name: name.to_string(),
            }),
        }
    }
}

/// A strategy plus the tunables it runs with
#[derive(Debug, Clone)]
pub struct CarePlanner {
    strategy: Strategy,
    config: PlannerConfig,
}

impl CarePlanner {
    pub fn new(strategy: Strategy, config: PlannerConfig) -> Self {
        Self { strategy, config }
    }

    /// Look up a strategy by name; `naive` takes its window from the config
    pub fn from_name(name: &str, config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        let strategy = match name.parse::<Strategy>()? {
            Strategy::FixedLookback { .. } => Strategy::FixedLookback {
                lookback_days: config.lookback_days,
            },
            other => other,
        };
        Ok(Self::new(strategy, config))
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    fn imputer(&self) -> Imputer {
        match self.strategy {
            Strategy::Bayesian => Imputer::FactorScaled(self.config.bayes_imputation_factor),
            Strategy::FixedLookback { .. } | Strategy::AdaptiveLookback => Imputer::NeedProbability,
        }
    }

    fn lookback_days(&self, care_type: &str, need: f64) -> Result<u32> {
        match self.strategy {
            Strategy::Bayesian => Ok(bayes::BAYES_LOOKBACK_DAYS),
            Strategy::FixedLookback { lookback_days } => Ok(lookback_days),
            Strategy::AdaptiveLookback => window::adaptive_lookback(care_type, need),
        }
    }

    /// Adjusted need for one care type
    pub fn need(
        &self,
        plant: &PlantUnit,
        care_type: &str,
        climate: &EnvironmentSnapshot,
        optimise: bool,
    ) -> Result<f64> {
        let freq = plant.needs.baseline_need(care_type, self.config.default_need)?;
        if !optimise {
            tracing::debug!("optimisation is off");
            return Ok(freq);
        }

        tracing::debug!("optimisation is on");
        let mut optimiser = CareOptimiser::for_care_type(care_type);
        Ok(optimiser.opt(freq, &plant.needs, &plant.conditions, climate))
    }

    /// Decide whether `care_type` is due on `date` (1) or not (0)
    #[allow(clippy::too_many_arguments)]
    pub fn step<R: Rng>(
        &self,
        plant: &PlantUnit,
        care_type: &str,
        date: NaiveDate,
        climate: &EnvironmentSnapshot,
        optimise: bool,
        impute: bool,
        rng: &mut R,
    ) -> Result<u8> {
        let need = self.need(plant, care_type, climate, optimise)?;
        let lookback = self.lookback_days(care_type, need)?;

        let window = dates_to_binary(
            &plant.history.dates(care_type),
            date - Duration::days(i64::from(lookback)),
            date,
        );
        tracing::debug!(need, lookback, ?window, "{} step for {}", self.strategy, date);

        let window = if impute {
            self.imputer().impute(window, need, rng)
        } else {
            window
        };

        let mu = window::realized_frequency(&window);
        tracing::debug!(mu, "realized frequency");

        let decision = match self.strategy {
            Strategy::Bayesian => bayes::decide(need, mu, rng),
            Strategy::FixedLookback { .. } | Strategy::AdaptiveLookback => {
                lookback::decide(need, mu, &window)
            }
        };
        Ok(decision)
    }

    /// Plan the next `request.n_days` days with a thread-local RNG
    pub fn plan(
        &self,
        plant: &PlantUnit,
        care_type: &str,
        climate: &EnvironmentSnapshot,
        request: &PlanRequest,
    ) -> Result<CarePlan> {
        self.plan_with_rng(plant, care_type, climate, request, &mut rand::thread_rng())
    }

    /// Plan with a caller-supplied RNG (seed it for reproducible plans)
    ///
    /// The plant is cloned; its history is never modified.
    pub fn plan_with_rng<R: Rng>(
        &self,
        plant: &PlantUnit,
        care_type: &str,
        climate: &EnvironmentSnapshot,
        request: &PlanRequest,
        rng: &mut R,
    ) -> Result<CarePlan> {
        let start_date = request.resolved_start();
        tracing::info!(
            plant = %plant.id,
            care_type,
            strategy = %self.strategy,
            n_days = request.n_days,
            "running planner from {}",
            start_date
        );

        let mut simulated = plant.clone();
        let mut days = Vec::with_capacity(request.n_days as usize);

        for n_day in 1..=request.n_days {
            let date = start_date + Duration::days(i64::from(n_day));
            // no imputation on the first planned day
            let impute = request.impute && n_day > 1;

            let decision = self.step(&simulated, care_type, date, climate, request.optimise, impute, rng)?;
            if decision == 1 {
                simulated.history.record(care_type, date);
            }

            tracing::debug!("to {} on {}: {}", care_type, date, decision);
            days.push(PlannedDay { date, decision });
        }

        Ok(CarePlan {
            plant_id: plant.id.clone(),
            care_type: care_type.to_string(),
            strategy: self.strategy.name().to_string(),
            days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::Conditions;
    use crate::history::{CareEvent, CareHistory};
    use crate::needs::SpeciesNeeds;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn run_date() -> NaiveDate {
        d(2022, 5, 30)
    }

    fn plant_with(needs_json: &str, events: Vec<CareEvent>) -> PlantUnit {
        PlantUnit::new(
            "0",
            "im-am-so-fake",
            "im-am-so-fake",
            Conditions::new(true)
                .with_score("isolation", 0.5)
                .with_score("light", 0.7)
                .with_score("drainage", 0.5),
            Arc::new(SpeciesNeeds::from_json(needs_json).unwrap()),
            CareHistory::new("0", events),
        )
    }

    fn plant() -> PlantUnit {
        plant_with(
            r#"{"water": {"freq": 0.20, "amount": 0.5, "watering_type": "top"}}"#,
            vec![
                CareEvent::new("0", "water", d(2022, 5, 24)),
                CareEvent::new("0", "water", d(2022, 5, 29)),
                CareEvent::new("0", "shower", d(2022, 5, 23)),
                CareEvent::new("0", "dust", d(2022, 5, 27)),
                CareEvent::new("0", "mist", d(2022, 5, 23)),
            ],
        )
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(2022)
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!("bayes".parse::<Strategy>().unwrap(), Strategy::Bayesian);
        assert_eq!("dynamic".parse::<Strategy>().unwrap(), Strategy::AdaptiveLookback);
        assert_eq!(
            "naive".parse::<Strategy>().unwrap(),
            Strategy::FixedLookback { lookback_days: 15 }
        );
        for name in Strategy::all_names() {
            assert_eq!(name.parse::<Strategy>().unwrap().name(), *name);
        }
    }

    #[test]
    fn test_unknown_planner_is_an_error() {
        let err = CarePlanner::from_name("greedy", PlannerConfig::default()).unwrap_err();
        assert!(matches!(err, CareError::UnknownPlanner { ref name } if name == "greedy"));
    }

    #[test]
    fn test_naive_lookback_from_config() {
        let config = PlannerConfig { lookback_days: 20, ..Default::default() };
        let planner = CarePlanner::from_name("naive", config).unwrap();
        assert_eq!(planner.strategy(), Strategy::FixedLookback { lookback_days: 20 });
    }

    #[test]
    fn test_naive_planner_step() {
        let planner = CarePlanner::new(Strategy::FixedLookback { lookback_days: 20 }, PlannerConfig::default());
        let decision = planner
            .step(&plant(), "water", run_date(), &EnvironmentSnapshot::empty(), false, false, &mut rng())
            .unwrap();
        // 2 waterings in 20 days: 0.1 < 0.2
        assert_eq!(decision, 1);
    }

    #[test]
    fn test_dynamic_planner_step() {
        let planner = CarePlanner::from_name("dynamic", PlannerConfig::default()).unwrap();
        let decision = planner
            .step(&plant(), "water", run_date(), &EnvironmentSnapshot::empty(), false, false, &mut rng())
            .unwrap();
        // window of 5 days ends with yesterday's watering: tie, alternate to 0
        assert_eq!(decision, 0);
    }

    #[test]
    fn test_bayes_certain_cases() {
        let planner = CarePlanner::from_name("bayes", PlannerConfig::default()).unwrap();
        let always = plant_with(r#"{"water": {"freq": 1.0}}"#, vec![]);
        assert_eq!(
            planner
                .step(&always, "water", run_date(), &EnvironmentSnapshot::empty(), false, false, &mut rng())
                .unwrap(),
            1
        );

        let saturated = plant_with(
            r#"{"water": {"freq": 0.1}}"#,
            (25..=29).map(|day| CareEvent::new("0", "water", d(2022, 5, day))).collect(),
        );
        assert_eq!(
            planner
                .step(&saturated, "water", run_date(), &EnvironmentSnapshot::empty(), false, false, &mut rng())
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_unknown_care_type_uses_default_need() {
        let planner = CarePlanner::from_name("dynamic", PlannerConfig::default()).unwrap();
        let plant = plant();
        let need = planner.need(&plant, "repot", &EnvironmentSnapshot::empty(), true).unwrap();
        assert_eq!(need, 0.05);
    }

    #[test]
    fn test_zero_frequency_rejected() {
        let planner = CarePlanner::from_name("dynamic", PlannerConfig::default()).unwrap();
        let plant = plant_with(r#"{"shower": {"freq": 0}}"#, vec![]);
        let result = planner.plan_with_rng(
            &plant,
            "shower",
            &EnvironmentSnapshot::empty(),
            &PlanRequest::default().starting(run_date()),
            &mut rng(),
        );
        assert!(matches!(result, Err(CareError::InvalidFrequency { .. })));
    }

    #[test]
    fn test_first_day_never_imputes() {
        // freq 1.0 with no history: imputing would fill the window with ones
        // and turn the tie into a 0
        let planner = CarePlanner::from_name("naive", PlannerConfig::default()).unwrap();
        let plant = plant_with(r#"{"mist": {"freq": 1.0}}"#, vec![]);
        let climate = EnvironmentSnapshot::empty();

        let imputed_step = planner
            .step(&plant, "mist", run_date() + Duration::days(1), &climate, false, true, &mut rng())
            .unwrap();
        assert_eq!(imputed_step, 0);

        let request = PlanRequest::default().starting(run_date()).days(1).optimise(false).impute(true);
        let plan = planner.plan_with_rng(&plant, "mist", &climate, &request, &mut rng()).unwrap();
        assert_eq!(plan.decisions(), vec![1]);
    }

    #[test]
    fn test_plan_dates_and_isolation() {
        let planner = CarePlanner::from_name("bayes", PlannerConfig::default()).unwrap();
        let plant = plant();
        let before = plant.history.clone();

        let request = PlanRequest::default().starting(run_date()).days(7).optimise(false);
        let plan = planner
            .plan_with_rng(&plant, "water", &EnvironmentSnapshot::empty(), &request, &mut rng())
            .unwrap();

        assert_eq!(plan.days.len(), 7);
        assert_eq!(plan.days[0].date, d(2022, 5, 31));
        assert_eq!(plan.days[6].date, d(2022, 6, 6));
        assert!(plan.days.windows(2).all(|w| w[0].date < w[1].date));
        assert!(plan.decisions().iter().all(|&x| x <= 1));
        assert_eq!(plant.history, before);
    }

    #[test]
    fn test_decisions_are_binary_for_every_strategy() {
        let plant = plant();
        for name in Strategy::all_names() {
            let planner = CarePlanner::from_name(name, PlannerConfig::default()).unwrap();
            for seed in 0..20 {
                let request = PlanRequest::default().starting(run_date()).days(14).impute(true);
                let plan = planner
                    .plan_with_rng(
                        &plant,
                        "water",
                        &EnvironmentSnapshot::empty(),
                        &request,
                        &mut StdRng::seed_from_u64(seed),
                    )
                    .unwrap();
                assert!(plan.decisions().iter().all(|&x| x == 0 || x == 1));
            }
        }
    }

    #[test]
    fn test_seeded_plans_are_reproducible() {
        let planner = CarePlanner::from_name("bayes", PlannerConfig::default()).unwrap();
        let request = PlanRequest::default().starting(run_date()).days(30).impute(true);
        let climate = EnvironmentSnapshot::empty();

        let a = planner
            .plan_with_rng(&plant(), "water", &climate, &request, &mut StdRng::seed_from_u64(9))
            .unwrap();
        let b = planner
            .plan_with_rng(&plant(), "water", &climate, &request, &mut StdRng::seed_from_u64(9))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bayes_window_ignores_configured_lookback() {
        // Twelve waterings in the last 15 days, none in the last 3:
        // 15-day mu = 0.8 >= 0.2 gives p = 0, a 3-day window would give p = 0.2
        let config = PlannerConfig { lookback_days: 3, ..Default::default() };
        let planner = CarePlanner::from_name("bayes", config).unwrap();
        let plant = plant_with(
            r#"{"water": {"freq": 0.2}}"#,
            (15..=26).map(|day| CareEvent::new("0", "water", d(2022, 5, day))).collect(),
        );

        for seed in 0..50 {
            let decision = planner
                .step(
                    &plant,
                    "water",
                    run_date(),
                    &EnvironmentSnapshot::empty(),
                    false,
                    false,
                    &mut StdRng::seed_from_u64(seed),
                )
                .unwrap();
            assert_eq!(decision, 0, "seed {}", seed);
        }
    }

    #[test]
    fn test_naive_realized_frequency_rounds_half_to_even() {
        // 1 of 16 days: mu = 0.062 < 0.0625
        let planner = CarePlanner::new(Strategy::FixedLookback { lookback_days: 16 }, PlannerConfig::default());
        let plant = plant_with(
            r#"{"water": {"freq": 0.0625}}"#,
            vec![CareEvent::new("0", "water", d(2022, 5, 29))],
        );
        let decision = planner
            .step(&plant, "water", run_date(), &EnvironmentSnapshot::empty(), false, false, &mut rng())
            .unwrap();
        assert_eq!(decision, 1);
    }

    #[test]
    fn test_cold_climate_shortens_dynamic_window() {
        use crate::climate::DailyClimate;
        use approx::assert_relative_eq;

        let mut plant = plant_with(
            r#"{"water": {"freq": 0.15}, "air": {"temperature": {"min": 18, "max": 22}}}"#,
            vec![CareEvent::new("0", "water", d(2022, 5, 29))],
        );
        plant.conditions = Conditions::new(false);

        // 10 degrees below the optimum: temperature weight 2
        let cold = EnvironmentSnapshot::from_daily(
            (15..=29)
                .map(|day| DailyClimate {
                    date: d(2022, 5, day),
                    tavg: Some(10.0),
                    tmin: None,
                    tmax: None,
                    tsun: None,
                })
                .collect(),
        );

        let planner = CarePlanner::from_name("dynamic", PlannerConfig::default()).unwrap();
        assert_relative_eq!(planner.need(&plant, "water", &cold, true).unwrap(), 0.3, epsilon = 1e-9);

        // need 0.15: 7-day window, mu = 0.143 < 0.15
        let plain = planner
            .step(&plant, "water", run_date(), &cold, false, false, &mut rng())
            .unwrap();
        assert_eq!(plain, 1);

        // need 0.3: 3-day window, mu = 0.333 > 0.3
        let optimised = planner
            .step(&plant, "water", run_date(), &cold, true, false, &mut rng())
            .unwrap();
        assert_eq!(optimised, 0);
    }
}
