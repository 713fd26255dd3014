//! Machine-readable run reports.
//!
//! Batch runs emit one [`RunReport`] as a single JSON line so results
//! can be piped into other tools or diffed across runs.

use metroplan_core::plan::Plan;
use metroplan_core::simulation::Simulation;
use serde::{Deserialize, Serialize};

/// One build still in flight when the run ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    pub name: String,
    pub remaining: u32,
}

/// Final state of one plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    pub id: u32,
    pub settlement: String,
    pub kind: String,
    pub policy: String,
    pub status: String,
    pub life_quality: i32,
    pub economy: i32,
    pub environment: i32,
    pub completed: Vec<String>,
    pub under_construction: Vec<BuildReport>,
}

impl PlanReport {
    fn from_plan(plan: &Plan) -> Self {
        let scores = plan.scores();
        Self {
            id: plan.id(),
            settlement: plan.settlement().name().to_string(),
            kind: plan.settlement().kind().to_string(),
            policy: plan.policy().id().to_string(),
            status: plan.status().to_string(),
            life_quality: scores.life_quality,
            economy: scores.economy,
            environment: scores.environment,
            completed: plan
                .completed()
                .iter()
                .map(|facility| facility.blueprint().name.clone())
                .collect(),
            under_construction: plan
                .under_construction()
                .iter()
                .map(|facility| BuildReport {
                    name: facility.blueprint().name.clone(),
                    remaining: facility.remaining(),
                })
                .collect(),
        }
    }
}

/// Full report of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Steps completed.
    pub ticks: u64,
    /// Final state hash, for reproducibility checks.
    pub state_hash: u64,
    /// Per-plan results in id order.
    pub plans: Vec<PlanReport>,
}

impl RunReport {
    /// Capture the current state of a simulation.
    #[must_use]
    pub fn from_simulation(sim: &Simulation) -> Self {
        Self {
            ticks: sim.tick(),
            state_hash: sim.state_hash(),
            plans: sim.plans().iter().map(PlanReport::from_plan).collect(),
        }
    }

    /// Serialize to a single JSON line.
    #[must_use]
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!("{{\"error\":\"serialization failed: {e}\"}}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;

    fn stepped_simulation(steps: u64) -> Simulation {
        let mut sim = Scenario::demo().build().unwrap();
        for _ in 0..steps {
            sim.step().unwrap();
        }
        sim
    }

    #[test]
    fn test_report_captures_plans_in_id_order() {
        let sim = stepped_simulation(5);
        let report = RunReport::from_simulation(&sim);

        assert_eq!(report.ticks, 5);
        assert_eq!(report.state_hash, sim.state_hash());
        assert_eq!(report.plans.len(), 3);
        for (index, plan) in report.plans.iter().enumerate() {
            assert_eq!(plan.id as usize, index);
        }
        assert_eq!(report.plans[0].settlement, "Rivertown");
        assert_eq!(report.plans[0].kind, "village");
        assert_eq!(report.plans[0].policy, "nve");
    }

    #[test]
    fn test_report_scores_match_simulation() {
        let sim = stepped_simulation(8);
        let report = RunReport::from_simulation(&sim);

        for plan_report in &report.plans {
            let plan = sim.plan(plan_report.id).unwrap();
            let scores = plan.scores();
            assert_eq!(plan_report.life_quality, scores.life_quality);
            assert_eq!(plan_report.economy, scores.economy);
            assert_eq!(plan_report.environment, scores.environment);
            assert_eq!(plan_report.completed.len(), plan.completed().len());
            assert_eq!(
                plan_report.under_construction.len(),
                plan.under_construction().len()
            );
        }
    }

    #[test]
    fn test_json_line_round_trips() {
        let report = RunReport::from_simulation(&stepped_simulation(3));
        let line = report.to_json_line();

        assert!(!line.contains('\n'), "report must fit one line");
        let parsed: RunReport = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.ticks, report.ticks);
        assert_eq!(parsed.state_hash, report.state_hash);
        assert_eq!(parsed.plans.len(), report.plans.len());
    }
}
