//! Construction plans: the per-settlement state machine.
//!
//! A [`Plan`] owns the construction queue of one settlement. Each step
//! runs three phases in order: fill free slots through the selection
//! policy (only if the plan entered the step available), advance every
//! build by one tick, then recompute availability. The fill phase runs
//! before progress, so a facility started this step also advances this
//! step.
//!
//! Scores move exactly once, when a facility turns operational.

use serde::{Deserialize, Serialize};

use crate::catalog::{AxisScores, FacilityCatalog};
use crate::error::{PlanningError, Result};
use crate::facility::{Facility, FacilityStatus};
use crate::policy::SelectionPolicy;
use crate::settlement::Settlement;

/// Whether a plan can start new construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanStatus {
    /// At least one construction slot is free.
    Available,
    /// Every slot is occupied.
    Busy,
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Busy => write!(f, "busy"),
        }
    }
}

/// Facilities started and completed by one plan step.
#[derive(Debug, Clone, Default)]
pub struct StepEvents {
    /// Names of facilities whose construction started this step.
    pub started: Vec<String>,
    /// Names of facilities that turned operational this step.
    pub completed: Vec<String>,
}

/// A settlement's construction plan.
///
/// Holds a value copy of its settlement, the owned selection policy,
/// one queue of builds in flight and one list of operational
/// facilities. Two invariants hold at all times, including after a
/// failed step: the queue never exceeds the settlement's capacity, and
/// the plan is busy exactly when the queue is full.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Plan {
    /// Registry-assigned identifier.
    id: u32,
    /// Settlement this plan builds for.
    settlement: Settlement,
    /// Strategy picking the next blueprint.
    policy: SelectionPolicy,
    /// Current availability.
    status: PlanStatus,
    /// Builds in flight, oldest first.
    under_construction: Vec<Facility>,
    /// Operational facilities in completion order.
    completed: Vec<Facility>,
    /// Sum of the impacts of all completed facilities.
    scores: AxisScores,
}

impl Plan {
    /// Create an empty plan for a settlement.
    ///
    /// The policy is re-seeded on install, so a balanced policy created
    /// with stale totals starts from this plan's state.
    #[must_use]
    pub fn new(id: u32, settlement: Settlement, policy: SelectionPolicy) -> Self {
        let mut plan = Self {
            id,
            settlement,
            policy,
            status: PlanStatus::Available,
            under_construction: Vec::new(),
            completed: Vec::new(),
            scores: AxisScores::ZERO,
        };
        plan.resync_policy();
        plan
    }

    /// Registry-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// The settlement this plan builds for.
    #[must_use]
    pub fn settlement(&self) -> &Settlement {
        &self.settlement
    }

    /// The active selection policy.
    #[must_use]
    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    /// Current availability.
    #[must_use]
    pub const fn status(&self) -> PlanStatus {
        self.status
    }

    /// Accumulated scores of all completed facilities.
    #[must_use]
    pub const fn scores(&self) -> AxisScores {
        self.scores
    }

    /// Builds currently in flight, oldest first.
    #[must_use]
    pub fn under_construction(&self) -> &[Facility] {
        &self.under_construction
    }

    /// Operational facilities in completion order.
    #[must_use]
    pub fn completed(&self) -> &[Facility] {
        &self.completed
    }

    /// Concurrent construction capacity of the settlement.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.settlement.capacity()
    }

    /// Accumulated scores plus the impacts of everything in flight.
    ///
    /// This is the total the plan has committed to, and the seed value
    /// for a balanced policy.
    #[must_use]
    pub fn committed_scores(&self) -> AxisScores {
        let mut committed = self.scores;
        for facility in &self.under_construction {
            committed += facility.blueprint().impact;
        }
        committed
    }

    /// Advance the plan by one step.
    ///
    /// Runs the three phases in order: fill (if the plan entered the
    /// step available), progress, status. On a selection failure the
    /// partial fill stands, the progress phase is skipped, the status
    /// is still recomputed and the error propagates.
    pub fn step(&mut self, catalog: &FacilityCatalog) -> Result<StepEvents> {
        let mut events = StepEvents::default();

        if self.status == PlanStatus::Available {
            while self.under_construction.len() < self.capacity() {
                match self.policy.select(catalog) {
                    Ok(blueprint) => {
                        let facility = Facility::start(blueprint.clone(), self.settlement.name());
                        events.started.push(facility.name().to_string());
                        self.under_construction.push(facility);
                        self.resync_policy();
                    }
                    Err(err) => {
                        self.refresh_status();
                        return Err(err.into());
                    }
                }
            }
        }

        // Completions are swept out in reverse index order, so two
        // builds finishing the same step report newest first.
        for index in (0..self.under_construction.len()).rev() {
            if self.under_construction[index].advance() == FacilityStatus::Operational {
                let facility = self.under_construction.remove(index);
                self.scores += facility.blueprint().impact;
                events.completed.push(facility.name().to_string());
                self.completed.push(facility);
            }
        }
        self.resync_policy();

        self.refresh_status();
        Ok(events)
    }

    /// Insert an externally chosen facility into the construction queue.
    ///
    /// Bypasses the selection policy but still respects capacity; the
    /// facility scores at completion like any policy-selected build.
    pub fn add_facility(&mut self, facility: Facility) -> Result<()> {
        if self.under_construction.len() >= self.capacity() {
            return Err(PlanningError::CapacityExceeded {
                settlement: self.settlement.name().to_string(),
                capacity: self.capacity(),
            });
        }
        self.under_construction.push(facility);
        self.resync_policy();
        self.refresh_status();
        Ok(())
    }

    /// Replace the selection policy.
    ///
    /// The incoming policy is re-seeded from the committed totals, so a
    /// balanced policy taking over mid-plan accounts for everything
    /// already built or in flight.
    pub fn set_policy(&mut self, policy: SelectionPolicy) {
        self.policy = policy;
        self.resync_policy();
    }

    /// Adopt the full state of another plan for the same settlement.
    ///
    /// Fails without touching `self` if the plans belong to different
    /// settlements.
    pub fn assign_from(&mut self, other: &Plan) -> Result<()> {
        if self.settlement != other.settlement {
            return Err(PlanningError::SettlementMismatch {
                ours: self.settlement.name().to_string(),
                theirs: other.settlement.name().to_string(),
            });
        }
        self.id = other.id;
        self.policy = other.policy.clone();
        self.status = other.status;
        self.under_construction = other.under_construction.clone();
        self.completed = other.completed.clone();
        self.scores = other.scores;
        Ok(())
    }

    /// Re-seed the policy from the current committed totals.
    fn resync_policy(&mut self) {
        let committed = self.committed_scores();
        self.policy.resync(committed);
    }

    /// Recompute availability from queue length and capacity.
    fn refresh_status(&mut self) {
        self.status = if self.under_construction.len() >= self.capacity() {
            PlanStatus::Busy
        } else {
            PlanStatus::Available
        };
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "plan {} for {}", self.id, self.settlement)?;
        writeln!(f, "  status: {}", self.status)?;
        writeln!(f, "  policy: {}", self.policy)?;
        writeln!(f, "  life quality: {}", self.scores.life_quality)?;
        writeln!(f, "  economy: {}", self.scores.economy)?;
        write!(f, "  environment: {}", self.scores.environment)?;
        for facility in &self.completed {
            write!(f, "\n  {}: {}", facility.name(), facility.status())?;
        }
        for facility in &self.under_construction {
            write!(
                f,
                "\n  {}: {} ({} ticks left)",
                facility.name(),
                facility.status(),
                facility.remaining()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FacilityBlueprint, FacilityCategory};
    use crate::settlement::SettlementKind;

    fn village_plan(policy: SelectionPolicy) -> Plan {
        Plan::new(
            0,
            Settlement::new("Rivertown", SettlementKind::Village),
            policy,
        )
    }

    fn two_entry_catalog() -> FacilityCatalog {
        let mut catalog = FacilityCatalog::new();
        catalog
            .register(FacilityBlueprint::new(
                "A",
                FacilityCategory::LifeQuality,
                1,
                AxisScores::new(2, 0, 0),
            ))
            .unwrap();
        catalog
            .register(FacilityBlueprint::new(
                "B",
                FacilityCategory::Economy,
                2,
                AxisScores::new(0, 3, 0),
            ))
            .unwrap();
        catalog
    }

    #[test]
    fn test_new_plan_is_empty_and_available() {
        let plan = village_plan(SelectionPolicy::naive());
        assert_eq!(plan.status(), PlanStatus::Available);
        assert!(plan.under_construction().is_empty());
        assert!(plan.completed().is_empty());
        assert_eq!(plan.scores(), AxisScores::ZERO);
        assert_eq!(plan.capacity(), 1);
    }

    #[test]
    fn test_village_walkthrough() {
        let catalog = two_entry_catalog();
        let mut plan = village_plan(SelectionPolicy::naive());

        // Step 1: A (cost 1) starts and completes in the same step
        let events = plan.step(&catalog).unwrap();
        assert_eq!(events.started, vec!["A"]);
        assert_eq!(events.completed, vec!["A"]);
        assert_eq!(plan.scores(), AxisScores::new(2, 0, 0));
        assert_eq!(plan.status(), PlanStatus::Available);

        // Step 2: B (cost 2) starts and advances to one tick left
        let events = plan.step(&catalog).unwrap();
        assert_eq!(events.started, vec!["B"]);
        assert!(events.completed.is_empty());
        assert_eq!(plan.status(), PlanStatus::Busy);
        assert_eq!(plan.under_construction()[0].remaining(), 1);

        // Step 3: busy at entry, so no refill; B completes
        let events = plan.step(&catalog).unwrap();
        assert!(events.started.is_empty());
        assert_eq!(events.completed, vec!["B"]);
        assert_eq!(plan.scores(), AxisScores::new(2, 3, 0));
        assert_eq!(plan.status(), PlanStatus::Available);

        // Step 4: the rotation wraps back to A
        let events = plan.step(&catalog).unwrap();
        assert_eq!(events.started, vec!["A"]);
        assert_eq!(events.completed, vec!["A"]);
        assert_eq!(plan.scores(), AxisScores::new(4, 3, 0));
    }

    #[test]
    fn test_same_step_completions_report_newest_first() {
        let mut catalog = FacilityCatalog::new();
        for name in ["First", "Second"] {
            catalog
                .register(FacilityBlueprint::new(
                    name,
                    FacilityCategory::Economy,
                    1,
                    AxisScores::new(0, 1, 0),
                ))
                .unwrap();
        }
        let mut plan = Plan::new(
            0,
            Settlement::new("Twinport", SettlementKind::City),
            SelectionPolicy::naive(),
        );

        let events = plan.step(&catalog).unwrap();
        assert_eq!(events.started, vec!["First", "Second"]);
        assert_eq!(events.completed, vec!["Second", "First"]);
        assert_eq!(plan.scores(), AxisScores::new(0, 2, 0));
    }

    #[test]
    fn test_selection_error_leaves_consistent_state() {
        let mut catalog = FacilityCatalog::new();
        catalog
            .register(FacilityBlueprint::new(
                "Clinic",
                FacilityCategory::LifeQuality,
                2,
                AxisScores::new(3, 0, 0),
            ))
            .unwrap();
        let mut plan = village_plan(SelectionPolicy::economy());

        let result = plan.step(&catalog);
        assert!(matches!(result, Err(PlanningError::Selection(_))));
        assert!(plan.under_construction().is_empty());
        assert_eq!(plan.status(), PlanStatus::Available);

        // Once a matching blueprint exists, stepping recovers
        catalog
            .register(FacilityBlueprint::new(
                "Mill",
                FacilityCategory::Economy,
                1,
                AxisScores::new(0, 2, 0),
            ))
            .unwrap();
        let events = plan.step(&catalog).unwrap();
        assert_eq!(events.started, vec!["Mill"]);
        assert_eq!(events.completed, vec!["Mill"]);
    }

    #[test]
    fn test_add_facility_respects_capacity() {
        let catalog = two_entry_catalog();
        let blueprint = catalog.get("B").unwrap().clone();
        let mut plan = village_plan(SelectionPolicy::naive());

        plan.add_facility(Facility::start(blueprint.clone(), "Rivertown"))
            .unwrap();
        assert_eq!(plan.status(), PlanStatus::Busy);

        let result = plan.add_facility(Facility::start(blueprint, "Rivertown"));
        assert!(matches!(
            result,
            Err(PlanningError::CapacityExceeded { capacity: 1, .. })
        ));
        assert_eq!(plan.under_construction().len(), 1);
    }

    #[test]
    fn test_queued_facility_scores_at_completion() {
        let catalog = two_entry_catalog();
        let blueprint = catalog.get("B").unwrap().clone();
        let mut plan = village_plan(SelectionPolicy::naive());

        plan.add_facility(Facility::start(blueprint, "Rivertown"))
            .unwrap();
        assert_eq!(plan.scores(), AxisScores::ZERO);

        plan.step(&catalog).unwrap();
        assert_eq!(plan.scores(), AxisScores::ZERO);
        let events = plan.step(&catalog).unwrap();
        assert_eq!(events.completed, vec!["B"]);
        assert_eq!(plan.scores(), AxisScores::new(0, 3, 0));
    }

    #[test]
    fn test_set_policy_seeds_balanced_from_committed_totals() {
        let mut plan = village_plan(SelectionPolicy::naive());
        plan.scores = AxisScores::new(3, 4, 5);
        plan.under_construction.push(Facility::start(
            FacilityBlueprint::new(
                "Plaza",
                FacilityCategory::LifeQuality,
                2,
                AxisScores::new(1, 1, 1),
            ),
            "Rivertown",
        ));

        plan.set_policy(SelectionPolicy::balanced(AxisScores::ZERO));
        assert_eq!(
            plan.policy().balanced_totals(),
            Some(AxisScores::new(4, 5, 6))
        );
    }

    #[test]
    fn test_committed_scores_include_builds_in_flight() {
        let catalog = two_entry_catalog();
        let mut plan = village_plan(SelectionPolicy::naive());
        plan.add_facility(Facility::start(catalog.get("B").unwrap().clone(), "Rivertown"))
            .unwrap();

        assert_eq!(plan.scores(), AxisScores::ZERO);
        assert_eq!(plan.committed_scores(), AxisScores::new(0, 3, 0));
    }

    #[test]
    fn test_assign_from_same_settlement() {
        let catalog = two_entry_catalog();
        let mut source = village_plan(SelectionPolicy::naive());
        source.step(&catalog).unwrap();

        let mut target = village_plan(SelectionPolicy::economy());
        target.assign_from(&source).unwrap();
        assert_eq!(target.scores(), source.scores());
        assert_eq!(target.policy().id(), "nve");
        assert_eq!(target.completed().len(), 1);
    }

    #[test]
    fn test_assign_from_rejects_other_settlement() {
        let source = Plan::new(
            1,
            Settlement::new("Highspire", SettlementKind::City),
            SelectionPolicy::naive(),
        );
        let mut target = village_plan(SelectionPolicy::naive());

        let result = target.assign_from(&source);
        assert!(matches!(
            result,
            Err(PlanningError::SettlementMismatch { .. })
        ));
        assert_eq!(target.id(), 0);
        assert_eq!(target.policy().id(), "nve");
    }

    #[test]
    fn test_display_dump() {
        let catalog = two_entry_catalog();
        let mut plan = village_plan(SelectionPolicy::naive());
        plan.step(&catalog).unwrap();
        plan.step(&catalog).unwrap();

        let dump = plan.to_string();
        assert!(dump.starts_with("plan 0 for Rivertown (village)"));
        assert!(dump.contains("status: busy"));
        assert!(dump.contains("policy: nve"));
        assert!(dump.contains("life quality: 2"));
        assert!(dump.contains("A: operational"));
        assert!(dump.contains("B: under construction (1 ticks left)"));
    }
}
