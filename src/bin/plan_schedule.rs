// Plan Schedule Binary Entry Point
//
// Purpose: plan one care type for every plant in a JSON fixture and print due dates
// Usage: cargo run --bin plan_schedule -- <fixture.json> [care_type] [strategy]
//
// Configuration: CARE_* environment variables (see PlannerConfig::from_env),
// or a JSON file named by CARE_CONFIG.

use anyhow::{Context, Result};
use care_planner_rust::{
    CareEvent, CarePlanner, ClimateCache, Conditions, DailyClimate, InMemoryLedger, NeedsCache,
    PlanRequest, PlannerConfig, PlantUnit, Repertoire, SpeciesNeeds, StaticClimate,
};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Deserialize)]
struct PlantEntry {
    /// Generated when absent
    #[serde(default)]
    id: Option<String>,
    name: String,
    species: String,
    #[serde(default)]
    conditions: Conditions,
}

#[derive(Debug, Deserialize)]
struct Fixture {
    plants: Vec<PlantEntry>,
    #[serde(default)]
    needs: FxHashMap<String, SpeciesNeeds>,
    #[serde(default)]
    events: Vec<CareEvent>,
    #[serde(default)]
    climate: Vec<DailyClimate>,
}

fn load_fixture(path: &Path) -> Result<Fixture> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture: {:?}", path))?;
    serde_json::from_str(&contents).with_context(|| "Failed to parse fixture JSON")
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "care_planner_rust=info,plan_schedule=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let fixture_path = args
        .next()
        .context("usage: plan_schedule <fixture.json> [care_type] [strategy]")?;
    let care_type = args.next().unwrap_or_else(|| "water".to_string());
    let strategy = args.next().unwrap_or_else(|| "dynamic".to_string());

    let config = match std::env::var("CARE_CONFIG") {
        Ok(path) => PlannerConfig::load(Path::new(&path))?,
        Err(_) => PlannerConfig::from_env(),
    };

    tracing::info!("Configuration:");
    tracing::info!("  fixture: {}", fixture_path);
    tracing::info!("  care_type: {}", care_type);
    tracing::info!("  strategy: {}", strategy);
    tracing::info!("  horizon_days: {}", config.horizon_days);

    let fixture = load_fixture(Path::new(&fixture_path))?;

    let ledger = Arc::new(InMemoryLedger::new());
    for (species, needs) in fixture.needs {
        ledger.insert_needs(&species, needs);
    }
    let mut duplicates = 0;
    for event in fixture.events {
        if !ledger.insert_event(event) {
            duplicates += 1;
        }
    }
    if duplicates > 0 {
        tracing::warn!("ignored {} duplicate care events", duplicates);
    }

    let needs_cache = NeedsCache::new(ledger.clone(), &config);
    let climate_cache = ClimateCache::new(Arc::new(StaticClimate::new(fixture.climate)), &config);

    let mut repertoire = Repertoire::new();
    for entry in fixture.plants {
        match entry.id {
            Some(id) => {
                let plant = PlantUnit::load(
                    &id,
                    &entry.name,
                    &entry.species,
                    entry.conditions,
                    &needs_cache,
                    ledger.as_ref(),
                )?;
                repertoire.insert(plant);
            }
            None => {
                repertoire.add(
                    &entry.name,
                    &entry.species,
                    entry.conditions,
                    &needs_cache,
                    ledger.as_ref(),
                )?;
            }
        }
    }

    let planner = CarePlanner::from_name(&strategy, config.clone())?;
    let request = PlanRequest::from_config(&config);
    let climate = request.climate(&climate_cache)?;

    let names: FxHashMap<String, String> = repertoire
        .iter()
        .map(|p| (p.id.clone(), p.name.clone()))
        .collect();

    for (plant_id, plan) in repertoire.plan_all(&planner, &care_type, &climate, &request) {
        let name = names.get(&plant_id).map(String::as_str).unwrap_or("?");
        match plan {
            Ok(plan) => {
                let dates: Vec<String> = plan.due_dates().iter().map(|d| d.to_string()).collect();
                if dates.is_empty() {
                    println!("{} ({}): no {} due", name, plant_id, care_type);
                } else {
                    println!("{} ({}): {} on {}", name, plant_id, care_type, dates.join(", "));
                }
            }
            Err(e) => println!("{} ({}): failed: {}", name, plant_id, e),
        }
    }

    Ok(())
}
