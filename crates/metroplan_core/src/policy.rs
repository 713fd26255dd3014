//! Facility selection policies.
//!
//! A policy decides which catalog entry a plan builds next. The set of
//! strategies is closed: each one is a variant of a private enum behind
//! the opaque [`SelectionPolicy`] struct, created through constructors
//! or the string-id factory. Round-robin strategies keep a cursor into
//! the catalog; the balanced strategy keeps running axis totals that the
//! owning plan re-seeds through [`SelectionPolicy::resync`].

use serde::{Deserialize, Serialize};

use crate::catalog::{AxisScores, FacilityBlueprint, FacilityCatalog, FacilityCategory};
use crate::error::{PlanningError, Result};

/// Errors that can occur while selecting a blueprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    /// The catalog has no entries at all.
    EmptyCatalog,
    /// No catalog entry matches the policy's category.
    Exhausted(FacilityCategory),
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCatalog => write!(f, "No facilities in the catalog"),
            Self::Exhausted(category) => {
                write!(f, "No {category} facilities in the catalog")
            }
        }
    }
}

impl std::error::Error for SelectionError {}

/// Which selection strategy a policy uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    /// Round-robin over the whole catalog.
    Naive,
    /// Minimize the spread between the three axis totals.
    Balanced,
    /// Round-robin over economy facilities only.
    Economy,
    /// Round-robin over environment facilities only.
    Sustainability,
}

impl PolicyKind {
    /// Stable short identifier, used in configuration and display.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Naive => "nve",
            Self::Balanced => "bal",
            Self::Economy => "eco",
            Self::Sustainability => "env",
        }
    }
}

/// Per-strategy runtime state.
///
/// Cursors hold the index of the last pick; `None` means no pick yet,
/// so the next scan starts at entry 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
enum PolicyState {
    Naive {
        cursor: Option<usize>,
    },
    Balanced {
        /// Committed axis totals the next pick should balance against.
        totals: AxisScores,
    },
    Economy {
        cursor: Option<usize>,
    },
    Sustainability {
        cursor: Option<usize>,
    },
}

/// A facility selection strategy together with its runtime state.
///
/// Policies are owned by exactly one plan and replaceable at runtime;
/// [`Clone`] produces an independent duplicate with the same state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionPolicy {
    state: PolicyState,
}

impl SelectionPolicy {
    /// Round-robin over the whole catalog.
    #[must_use]
    pub fn naive() -> Self {
        Self {
            state: PolicyState::Naive { cursor: None },
        }
    }

    /// Spread-minimizing policy seeded with the given axis totals.
    #[must_use]
    pub fn balanced(totals: AxisScores) -> Self {
        Self {
            state: PolicyState::Balanced { totals },
        }
    }

    /// Round-robin restricted to economy facilities.
    #[must_use]
    pub fn economy() -> Self {
        Self {
            state: PolicyState::Economy { cursor: None },
        }
    }

    /// Round-robin restricted to environment facilities.
    #[must_use]
    pub fn sustainability() -> Self {
        Self {
            state: PolicyState::Sustainability { cursor: None },
        }
    }

    /// Create a default-state policy from its short identifier.
    ///
    /// Known identifiers are `nve`, `bal`, `eco` and `env`.
    pub fn from_id(id: &str) -> Result<Self> {
        match id {
            "nve" => Ok(Self::naive()),
            "bal" => Ok(Self::balanced(AxisScores::ZERO)),
            "eco" => Ok(Self::economy()),
            "env" => Ok(Self::sustainability()),
            other => Err(PlanningError::InvalidArgument {
                what: "selection policy",
                value: other.to_string(),
            }),
        }
    }

    /// The strategy this policy uses.
    #[must_use]
    pub fn kind(&self) -> PolicyKind {
        match self.state {
            PolicyState::Naive { .. } => PolicyKind::Naive,
            PolicyState::Balanced { .. } => PolicyKind::Balanced,
            PolicyState::Economy { .. } => PolicyKind::Economy,
            PolicyState::Sustainability { .. } => PolicyKind::Sustainability,
        }
    }

    /// Short identifier of the strategy.
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.kind().id()
    }

    /// Pick the next blueprint to build.
    ///
    /// Round-robin strategies advance their cursor; the balanced strategy
    /// leaves its totals untouched (the owning plan updates them through
    /// [`resync`](Self::resync) once the pick is committed).
    pub fn select<'a>(
        &mut self,
        catalog: &'a FacilityCatalog,
    ) -> std::result::Result<&'a FacilityBlueprint, SelectionError> {
        if catalog.is_empty() {
            return Err(SelectionError::EmptyCatalog);
        }
        let entries = catalog.entries();
        match &mut self.state {
            PolicyState::Naive { cursor } => {
                let next = cursor.map_or(0, |last| (last + 1) % entries.len());
                *cursor = Some(next);
                Ok(&entries[next])
            }
            PolicyState::Economy { cursor } => {
                next_of_category(entries, cursor, FacilityCategory::Economy)
            }
            PolicyState::Sustainability { cursor } => {
                next_of_category(entries, cursor, FacilityCategory::Environment)
            }
            PolicyState::Balanced { totals } => {
                let mut best = 0;
                let mut best_spread = (*totals + entries[0].impact).spread();
                for (index, entry) in entries.iter().enumerate().skip(1) {
                    let spread = (*totals + entry.impact).spread();
                    // Strict comparison keeps ties on the earliest entry
                    if spread < best_spread {
                        best = index;
                        best_spread = spread;
                    }
                }
                Ok(&entries[best])
            }
        }
    }

    /// Re-seed strategy state from a plan's committed totals.
    ///
    /// `committed` is the plan's cumulative scores plus the impacts of
    /// everything still under construction. Only the balanced strategy
    /// carries such state; the other variants ignore the call.
    pub fn resync(&mut self, committed: AxisScores) {
        if let PolicyState::Balanced { totals } = &mut self.state {
            *totals = committed;
        }
    }

    /// Running totals of the balanced strategy, if this is one.
    #[must_use]
    pub fn balanced_totals(&self) -> Option<AxisScores> {
        match self.state {
            PolicyState::Balanced { totals } => Some(totals),
            _ => None,
        }
    }
}

impl std::fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Circular scan for the next entry of `category`, starting after the cursor.
///
/// Visits every entry exactly once before giving up.
fn next_of_category<'a>(
    entries: &'a [FacilityBlueprint],
    cursor: &mut Option<usize>,
    category: FacilityCategory,
) -> std::result::Result<&'a FacilityBlueprint, SelectionError> {
    let len = entries.len();
    let start = cursor.map_or(0, |last| (last + 1) % len);
    for offset in 0..len {
        let index = (start + offset) % len;
        if entries[index].category == category {
            *cursor = Some(index);
            return Ok(&entries[index]);
        }
    }
    Err(SelectionError::Exhausted(category))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FacilityBlueprint;

    fn catalog_of(entries: &[(&str, FacilityCategory)]) -> FacilityCatalog {
        let mut catalog = FacilityCatalog::new();
        for (name, category) in entries {
            catalog
                .register(FacilityBlueprint::new(*name, *category, 1, AxisScores::ZERO))
                .unwrap();
        }
        catalog
    }

    fn select_names(
        policy: &mut SelectionPolicy,
        catalog: &FacilityCatalog,
        n: usize,
    ) -> Vec<String> {
        (0..n)
            .map(|_| policy.select(catalog).unwrap().name.clone())
            .collect()
    }

    #[test]
    fn test_naive_round_robin_wraps() {
        let catalog = catalog_of(&[
            ("A", FacilityCategory::LifeQuality),
            ("B", FacilityCategory::Economy),
            ("C", FacilityCategory::Environment),
        ]);
        let mut policy = SelectionPolicy::naive();

        assert_eq!(select_names(&mut policy, &catalog, 4), vec!["A", "B", "C", "A"]);
    }

    #[test]
    fn test_economy_skips_other_categories_and_wraps() {
        let catalog = catalog_of(&[
            ("A", FacilityCategory::LifeQuality),
            ("B", FacilityCategory::Economy),
            ("C", FacilityCategory::Environment),
            ("D", FacilityCategory::Economy),
        ]);
        let mut policy = SelectionPolicy::economy();

        assert_eq!(select_names(&mut policy, &catalog, 3), vec!["B", "D", "B"]);
    }

    #[test]
    fn test_sustainability_scans_for_environment() {
        let catalog = catalog_of(&[
            ("A", FacilityCategory::Economy),
            ("B", FacilityCategory::Environment),
            ("C", FacilityCategory::LifeQuality),
        ]);
        let mut policy = SelectionPolicy::sustainability();

        assert_eq!(select_names(&mut policy, &catalog, 2), vec!["B", "B"]);
    }

    #[test]
    fn test_category_exhausted() {
        let catalog = catalog_of(&[
            ("A", FacilityCategory::LifeQuality),
            ("B", FacilityCategory::Environment),
        ]);
        let mut policy = SelectionPolicy::economy();

        let result = policy.select(&catalog);
        assert_eq!(
            result.unwrap_err(),
            SelectionError::Exhausted(FacilityCategory::Economy)
        );
    }

    #[test]
    fn test_balanced_minimizes_spread() {
        let mut catalog = FacilityCatalog::new();
        catalog
            .register(FacilityBlueprint::new(
                "X",
                FacilityCategory::LifeQuality,
                1,
                AxisScores::new(5, 5, 5),
            ))
            .unwrap();
        catalog
            .register(FacilityBlueprint::new(
                "Y",
                FacilityCategory::Economy,
                1,
                AxisScores::new(10, 0, 0),
            ))
            .unwrap();

        let mut policy = SelectionPolicy::balanced(AxisScores::ZERO);
        assert_eq!(policy.select(&catalog).unwrap().name, "X");

        // Select alone never moves the totals
        assert_eq!(policy.balanced_totals(), Some(AxisScores::ZERO));
    }

    #[test]
    fn test_balanced_tie_breaks_to_earliest_entry() {
        let mut catalog = FacilityCatalog::new();
        for name in ["First", "Second"] {
            catalog
                .register(FacilityBlueprint::new(
                    name,
                    FacilityCategory::Economy,
                    1,
                    AxisScores::new(2, 2, 2),
                ))
                .unwrap();
        }

        let mut policy = SelectionPolicy::balanced(AxisScores::ZERO);
        assert_eq!(policy.select(&catalog).unwrap().name, "First");
        assert_eq!(policy.select(&catalog).unwrap().name, "First");
    }

    #[test]
    fn test_balanced_resync_reseeds_totals() {
        let mut policy = SelectionPolicy::balanced(AxisScores::ZERO);
        policy.resync(AxisScores::new(4, 5, 6));
        assert_eq!(policy.balanced_totals(), Some(AxisScores::new(4, 5, 6)));

        // Other variants ignore the call
        let mut naive = SelectionPolicy::naive();
        naive.resync(AxisScores::new(9, 9, 9));
        assert_eq!(naive.balanced_totals(), None);
    }

    #[test]
    fn test_empty_catalog_fails_for_every_variant() {
        let catalog = FacilityCatalog::new();
        for id in ["nve", "bal", "eco", "env"] {
            let mut policy = SelectionPolicy::from_id(id).unwrap();
            assert_eq!(
                policy.select(&catalog).unwrap_err(),
                SelectionError::EmptyCatalog,
                "variant {id}"
            );
        }
    }

    #[test]
    fn test_from_id_and_display() {
        for (id, kind) in [
            ("nve", PolicyKind::Naive),
            ("bal", PolicyKind::Balanced),
            ("eco", PolicyKind::Economy),
            ("env", PolicyKind::Sustainability),
        ] {
            let policy = SelectionPolicy::from_id(id).unwrap();
            assert_eq!(policy.kind(), kind);
            assert_eq!(policy.to_string(), id);
        }

        let result = SelectionPolicy::from_id("rnd");
        assert!(matches!(
            result,
            Err(PlanningError::InvalidArgument { what, .. }) if what == "selection policy"
        ));
    }

    #[test]
    fn test_cursor_survives_catalog_growth() {
        let mut catalog = catalog_of(&[
            ("A", FacilityCategory::Economy),
            ("B", FacilityCategory::Economy),
        ]);
        let mut policy = SelectionPolicy::naive();
        assert_eq!(policy.select(&catalog).unwrap().name, "A");

        catalog
            .register(FacilityBlueprint::new(
                "C",
                FacilityCategory::Environment,
                1,
                AxisScores::ZERO,
            ))
            .unwrap();

        // New entries join the rotation right away
        assert_eq!(select_names(&mut policy, &catalog, 3), vec!["B", "C", "A"]);
    }
}
