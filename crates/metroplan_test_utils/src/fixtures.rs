//! Test fixtures and helpers.
//!
//! Pre-built catalogs, settlements and simulations for consistent
//! testing across crates.

use metroplan_core::catalog::{AxisScores, FacilityBlueprint, FacilityCatalog, FacilityCategory};
use metroplan_core::policy::SelectionPolicy;
use metroplan_core::settlement::{Settlement, SettlementKind};
use metroplan_core::simulation::Simulation;

/// Blueprints of the standard mixed catalog as a plain list.
///
/// One life-quality entry, two economy entries and one environment
/// entry, with costs from 1 to 3 ticks.
#[must_use]
pub fn mixed_blueprints() -> Vec<FacilityBlueprint> {
    vec![
        FacilityBlueprint::new(
            "Clinic",
            FacilityCategory::LifeQuality,
            1,
            AxisScores::new(3, 0, 0),
        ),
        FacilityBlueprint::new(
            "Mill",
            FacilityCategory::Economy,
            2,
            AxisScores::new(0, 4, -1),
        ),
        FacilityBlueprint::new(
            "Park",
            FacilityCategory::Environment,
            3,
            AxisScores::new(1, 0, 5),
        ),
        FacilityBlueprint::new(
            "Market",
            FacilityCategory::Economy,
            1,
            AxisScores::new(0, 2, 0),
        ),
    ]
}

/// Standard mixed-category catalog used across tests.
#[must_use]
pub fn mixed_catalog() -> FacilityCatalog {
    let mut catalog = FacilityCatalog::new();
    for blueprint in mixed_blueprints() {
        catalog.register(blueprint).unwrap();
    }
    catalog
}

/// One settlement of each kind: Rivertown (village), Highspire (city)
/// and Grandmere (metropolis).
#[must_use]
pub fn three_settlements() -> Vec<Settlement> {
    vec![
        Settlement::new("Rivertown", SettlementKind::Village),
        Settlement::new("Highspire", SettlementKind::City),
        Settlement::new("Grandmere", SettlementKind::Metropolis),
    ]
}

/// Simulation with the mixed catalog, the three settlements and one
/// naive plan per settlement.
#[must_use]
pub fn populated_simulation() -> Simulation {
    let mut sim = Simulation::new();
    for settlement in three_settlements() {
        sim.add_settlement(settlement).unwrap();
    }
    for blueprint in mixed_blueprints() {
        sim.add_blueprint(blueprint).unwrap();
    }
    for name in ["Rivertown", "Highspire", "Grandmere"] {
        sim.add_plan(name, SelectionPolicy::naive()).unwrap();
    }
    sim
}
