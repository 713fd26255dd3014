//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the planning engine produces
//! identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! The engine promises full reproducibility: the same command sequence
//! always yields the same final state. Sources of non-determinism it
//! must not have:
//!
//! - **Unordered iteration**: plans are swept in creation order and
//!   catalogs keep registration order; no hash-map iteration anywhere.
//!
//! - **Randomness**: no random source exists; selection is entirely
//!   cursor- and score-driven.
//!
//! - **Error paths**: a failing step must fail identically on every
//!   run and leave identical state behind.
//!
//! The harness runs a scenario several times and compares state hashes
//! (see `Simulation::state_hash`).

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps simulated per run.
    pub steps: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic engine).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the runs matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a scenario multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the scenario
/// * `steps` - Number of steps to simulate per run
/// * `setup` - Function to create the initial state
/// * `step` - Function to advance the state by one step
/// * `hash` - Function to compute a state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..steps {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        steps,
    }
}

/// Simplified determinism verification for the `Simulation` type.
///
/// Runs the simulation twice with identical setup and verifies the
/// final state hashes match exactly. Step errors are swallowed: an
/// erroring step must still leave identical state on both runs.
pub fn verify_simulation_determinism<F>(setup_fn: F, num_steps: u64) -> bool
where
    F: Fn() -> metroplan_core::simulation::Simulation,
{
    let result = verify_determinism(
        2,
        num_steps,
        &setup_fn,
        |sim| {
            let _ = sim.step();
        },
        |sim| sim.state_hash(),
    );
    result.is_deterministic
}

/// Compare two simulation runs step-by-step, finding the first divergence.
///
/// Useful for debugging non-determinism by finding exactly when two
/// runs start to differ.
///
/// # Returns
///
/// `None` if the runs match throughout, `Some(step)` if they diverge
/// at that step.
pub fn find_first_divergence<F>(setup_fn: F, num_steps: u64) -> Option<u64>
where
    F: Fn() -> metroplan_core::simulation::Simulation,
{
    let mut sim1 = setup_fn();
    let mut sim2 = setup_fn();

    // Check initial state
    if sim1.state_hash() != sim2.state_hash() {
        return Some(0);
    }

    for step in 1..=num_steps {
        let _ = sim1.step();
        let _ = sim2.step();

        if sim1.state_hash() != sim2.state_hash() {
            return Some(step);
        }
    }

    None
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for engine inputs.
///
/// These strategies generate random but reproducible catalogs, policies
/// and settlements for property-based testing.
pub mod strategies {
    use metroplan_core::catalog::{AxisScores, FacilityBlueprint, FacilityCatalog, FacilityCategory};
    use metroplan_core::settlement::SettlementKind;
    use proptest::prelude::*;

    /// Generate a facility category.
    pub fn arb_category() -> impl Strategy<Value = FacilityCategory> {
        prop_oneof![
            Just(FacilityCategory::LifeQuality),
            Just(FacilityCategory::Economy),
            Just(FacilityCategory::Environment),
        ]
    }

    /// Generate an impact triple with small values on each axis.
    pub fn arb_impact() -> impl Strategy<Value = AxisScores> {
        (-5i32..=10, -5i32..=10, -5i32..=10)
            .prop_map(|(lq, eco, env)| AxisScores::new(lq, eco, env))
    }

    /// Generate a build cost (1 to 6 ticks).
    pub fn arb_cost() -> impl Strategy<Value = u32> {
        1u32..=6
    }

    /// Generate a settlement kind.
    pub fn arb_settlement_kind() -> impl Strategy<Value = SettlementKind> {
        prop_oneof![
            Just(SettlementKind::Village),
            Just(SettlementKind::City),
            Just(SettlementKind::Metropolis),
        ]
    }

    /// Generate a policy identifier.
    pub fn arb_policy_id() -> impl Strategy<Value = &'static str> {
        prop_oneof![Just("nve"), Just("bal"), Just("eco"), Just("env")]
    }

    /// Generate the raw parts of a catalog: per-entry category, cost
    /// and impact. Entry names are assigned positionally by
    /// [`catalog_from_parts`].
    pub fn arb_catalog_parts(
        max_len: usize,
    ) -> impl Strategy<Value = Vec<(FacilityCategory, u32, AxisScores)>> {
        proptest::collection::vec((arb_category(), arb_cost(), arb_impact()), 1..max_len)
    }

    /// Build a catalog from generated parts, naming entries F0, F1, ...
    #[must_use]
    pub fn catalog_from_parts(parts: &[(FacilityCategory, u32, AxisScores)]) -> FacilityCatalog {
        let mut catalog = FacilityCatalog::new();
        for (i, (category, cost, impact)) in parts.iter().enumerate() {
            catalog
                .register(FacilityBlueprint::new(
                    format!("F{i}"),
                    *category,
                    *cost,
                    *impact,
                ))
                .unwrap();
        }
        catalog
    }
}
