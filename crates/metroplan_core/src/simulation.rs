//! The simulation registry and step sweep.
//!
//! [`Simulation`] owns the whole planning world: the registered
//! settlements, the shared facility catalog and every construction
//! plan. One call to [`Simulation::step`] advances every plan by one
//! tick, in plan creation order, and reports what started and
//! completed.
//!
//! # Determinism
//!
//! The engine is fully deterministic: plans are swept in creation
//! order, catalogs keep registration order, and there is no randomness
//! anywhere. The same command sequence always produces the same state.
//!
//! # Example
//!
//! ```
//! use metroplan_core::catalog::{AxisScores, FacilityBlueprint, FacilityCategory};
//! use metroplan_core::policy::SelectionPolicy;
//! use metroplan_core::settlement::{Settlement, SettlementKind};
//! use metroplan_core::simulation::Simulation;
//!
//! let mut sim = Simulation::new();
//! sim.add_settlement(Settlement::new("Rivertown", SettlementKind::Village))
//!     .unwrap();
//! sim.add_blueprint(FacilityBlueprint::new(
//!     "Park",
//!     FacilityCategory::Environment,
//!     2,
//!     AxisScores::new(1, 0, 3),
//! ))
//! .unwrap();
//! let plan_id = sim.add_plan("Rivertown", SelectionPolicy::naive()).unwrap();
//!
//! let events = sim.step().unwrap();
//! assert_eq!(events.started.len(), 1);
//! assert_eq!(sim.tick(), 1);
//! assert_eq!(sim.plan(plan_id).unwrap().under_construction().len(), 1);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::catalog::{FacilityBlueprint, FacilityCatalog};
use crate::error::{PlanningError, Result};
use crate::plan::Plan;
use crate::policy::SelectionPolicy;
use crate::settlement::Settlement;

/// A construction event attributed to a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityEvent {
    /// Plan the event belongs to.
    pub plan: u32,
    /// Facility type name.
    pub facility: String,
}

/// Events generated during one simulation step.
#[derive(Debug, Clone, Default)]
pub struct TickEvents {
    /// Construction starts across all plans, in sweep order.
    pub started: Vec<FacilityEvent>,
    /// Completions across all plans, in sweep order.
    pub completed: Vec<FacilityEvent>,
}

/// The whole planning world.
///
/// `Clone` produces a fully independent deep copy, which is how
/// snapshots work: hold a clone, swap it back in to roll the world
/// back. The plan-id counter is part of the state, so a restored
/// snapshot also rewinds id allocation.
#[derive(Debug, Clone, Default, Hash, Serialize, Deserialize)]
pub struct Simulation {
    /// Registered settlements in registration order.
    settlements: Vec<Settlement>,
    /// Shared facility catalog.
    catalog: FacilityCatalog,
    /// Plans in creation order; the sweep follows this order.
    plans: Vec<Plan>,
    /// Next plan id to assign.
    next_plan_id: u32,
    /// Completed step count.
    tick: u64,
}

impl Simulation {
    /// Create an empty simulation at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a settlement.
    ///
    /// Settlement names are unique across the simulation.
    pub fn add_settlement(&mut self, settlement: Settlement) -> Result<()> {
        if self.has_settlement(settlement.name()) {
            return Err(PlanningError::DuplicateSettlement(
                settlement.name().to_string(),
            ));
        }
        self.settlements.push(settlement);
        Ok(())
    }

    /// Register a facility blueprint in the shared catalog.
    ///
    /// Every plan sees the new entry from its next fill phase on;
    /// builds already in flight are untouched.
    pub fn add_blueprint(&mut self, blueprint: FacilityBlueprint) -> Result<()> {
        self.catalog.register(blueprint)
    }

    /// Create a plan for a registered settlement and return its id.
    pub fn add_plan(&mut self, settlement_name: &str, policy: SelectionPolicy) -> Result<u32> {
        let settlement = self
            .settlement(settlement_name)
            .ok_or_else(|| PlanningError::SettlementNotFound(settlement_name.to_string()))?
            .clone();
        let id = self.next_plan_id;
        self.next_plan_id += 1;
        self.plans.push(Plan::new(id, settlement, policy));
        Ok(id)
    }

    /// Look up a settlement by name.
    #[must_use]
    pub fn settlement(&self, name: &str) -> Option<&Settlement> {
        self.settlements.iter().find(|s| s.name() == name)
    }

    /// Check whether a settlement is registered.
    #[must_use]
    pub fn has_settlement(&self, name: &str) -> bool {
        self.settlement(name).is_some()
    }

    /// All registered settlements in registration order.
    #[must_use]
    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    /// The shared facility catalog.
    #[must_use]
    pub fn catalog(&self) -> &FacilityCatalog {
        &self.catalog
    }

    /// Look up a plan by id.
    pub fn plan(&self, id: u32) -> Result<&Plan> {
        self.plans
            .iter()
            .find(|p| p.id() == id)
            .ok_or(PlanningError::PlanNotFound(id))
    }

    /// Look up a plan by id, mutably.
    pub fn plan_mut(&mut self, id: u32) -> Result<&mut Plan> {
        self.plans
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(PlanningError::PlanNotFound(id))
    }

    /// All plans in creation order.
    #[must_use]
    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    /// Number of completed steps.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance every plan by one step, in creation order.
    ///
    /// Aborts on the first failing plan without advancing the tick
    /// counter; plans swept before the failure keep their progress.
    pub fn step(&mut self) -> Result<TickEvents> {
        let mut events = TickEvents::default();
        let catalog = &self.catalog;
        for plan in &mut self.plans {
            let step_events = plan.step(catalog)?;
            let id = plan.id();
            events.started.extend(
                step_events
                    .started
                    .into_iter()
                    .map(|facility| FacilityEvent { plan: id, facility }),
            );
            events.completed.extend(
                step_events
                    .completed
                    .into_iter()
                    .map(|facility| FacilityEvent { plan: id, facility }),
            );
        }
        self.tick += 1;

        tracing::debug!(
            tick = self.tick,
            started = events.started.len(),
            completed = events.completed.len(),
            "step complete"
        );

        Ok(events)
    }

    /// Compute a hash of the complete simulation state.
    ///
    /// Covers every field that influences future steps, including
    /// policy cursors and balanced totals. Two simulations fed the
    /// same inputs hash identically; reproducibility tests rely on
    /// this.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
