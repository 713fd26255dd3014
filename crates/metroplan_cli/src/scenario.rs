//! Scenario loading and parsing.
//!
//! Scenarios describe an initial world as a RON document, as a
//! structured alternative to line-oriented config files. A scenario
//! names its settlements, the shared facility catalog and the plans to
//! open, and builds into a ready-to-step [`Simulation`].

use std::path::Path;

use metroplan_core::catalog::{AxisScores, FacilityBlueprint, FacilityCategory};
use metroplan_core::error::PlanningError;
use metroplan_core::policy::SelectionPolicy;
use metroplan_core::settlement::{Settlement, SettlementKind};
use metroplan_core::simulation::Simulation;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// The scenario contradicts the planning rules.
    #[error("Invalid scenario: {0}")]
    Invalid(#[from] PlanningError),
}

/// A settlement declaration in a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementSetup {
    /// Unique settlement name.
    pub name: String,
    /// Kind determining construction capacity.
    pub kind: SettlementKind,
}

/// A facility blueprint declaration in a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilitySetup {
    /// Unique facility type name.
    pub name: String,
    /// Axis the facility belongs to.
    pub category: FacilityCategory,
    /// Construction time in ticks, at least 1.
    pub cost: u32,
    /// Score deltas granted on completion.
    pub impact: AxisScores,
}

/// A plan declaration in a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSetup {
    /// Settlement the plan builds for.
    pub settlement: String,
    /// Selection policy id (`nve`, `bal`, `eco` or `env`).
    pub policy: String,
}

/// A complete scenario configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Settlements to register.
    pub settlements: Vec<SettlementSetup>,
    /// Facility blueprints for the shared catalog.
    pub facilities: Vec<FacilitySetup>,
    /// Plans to open, in id order.
    pub plans: Vec<PlanSetup>,
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let scenario = Self::from_ron_str(&contents)?;
        tracing::info!(name = %scenario.name, "loaded scenario");
        Ok(scenario)
    }

    /// Parse a scenario from RON text.
    pub fn from_ron_str(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(contents)
    }

    /// Built-in demo scenario: three settlements racing different policies.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            name: "Three towns".to_string(),
            description: "A village, a city and a metropolis develop the same catalog \
                          under different selection policies"
                .to_string(),
            settlements: vec![
                SettlementSetup {
                    name: "Rivertown".to_string(),
                    kind: SettlementKind::Village,
                },
                SettlementSetup {
                    name: "Highspire".to_string(),
                    kind: SettlementKind::City,
                },
                SettlementSetup {
                    name: "Grandmere".to_string(),
                    kind: SettlementKind::Metropolis,
                },
            ],
            facilities: vec![
                FacilitySetup {
                    name: "Clinic".to_string(),
                    category: FacilityCategory::LifeQuality,
                    cost: 1,
                    impact: AxisScores::new(3, 0, 0),
                },
                FacilitySetup {
                    name: "Mill".to_string(),
                    category: FacilityCategory::Economy,
                    cost: 2,
                    impact: AxisScores::new(0, 4, -1),
                },
                FacilitySetup {
                    name: "Park".to_string(),
                    category: FacilityCategory::Environment,
                    cost: 3,
                    impact: AxisScores::new(1, 0, 5),
                },
                FacilitySetup {
                    name: "Market".to_string(),
                    category: FacilityCategory::Economy,
                    cost: 1,
                    impact: AxisScores::new(0, 2, 0),
                },
            ],
            plans: vec![
                PlanSetup {
                    settlement: "Rivertown".to_string(),
                    policy: "nve".to_string(),
                },
                PlanSetup {
                    settlement: "Highspire".to_string(),
                    policy: "eco".to_string(),
                },
                PlanSetup {
                    settlement: "Grandmere".to_string(),
                    policy: "bal".to_string(),
                },
            ],
        }
    }

    /// Build a simulation with every declaration applied.
    pub fn build(&self) -> Result<Simulation, ScenarioError> {
        let mut sim = Simulation::new();
        for settlement in &self.settlements {
            sim.add_settlement(Settlement::new(settlement.name.clone(), settlement.kind))?;
        }
        for facility in &self.facilities {
            sim.add_blueprint(FacilityBlueprint::new(
                facility.name.clone(),
                facility.category,
                facility.cost,
                facility.impact,
            ))?;
        }
        for plan in &self.plans {
            let policy = SelectionPolicy::from_id(&plan.policy)?;
            sim.add_plan(&plan.settlement, policy)?;
        }
        Ok(sim)
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::demo()
    }
}
