//! Facility construction instances.
//!
//! A [`Facility`] is one concrete build of a blueprint for one settlement.
//! It carries its own countdown: one cost unit is worked off per tick
//! until construction finishes and the facility turns operational.

use serde::{Deserialize, Serialize};

use crate::catalog::FacilityBlueprint;

/// Construction state of a facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacilityStatus {
    /// Construction in progress; the facility does not score yet.
    UnderConstruction,
    /// Construction finished; the impact has been applied to the plan.
    Operational,
}

impl std::fmt::Display for FacilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnderConstruction => write!(f, "under construction"),
            Self::Operational => write!(f, "operational"),
        }
    }
}

/// A facility instance owned by exactly one plan.
///
/// Holds a value copy of its blueprint, so catalog growth after the
/// build started never affects it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Facility {
    /// Blueprint this facility was built from.
    blueprint: FacilityBlueprint,
    /// Name of the settlement this facility belongs to.
    settlement: String,
    /// Current construction state.
    status: FacilityStatus,
    /// Ticks of work left until operational.
    remaining: u32,
}

impl Facility {
    /// Start construction of a blueprint for a settlement.
    ///
    /// The countdown starts at the blueprint's cost.
    #[must_use]
    pub fn start(blueprint: FacilityBlueprint, settlement: impl Into<String>) -> Self {
        let remaining = blueprint.cost;
        Self {
            blueprint,
            settlement: settlement.into(),
            status: FacilityStatus::UnderConstruction,
            remaining,
        }
    }

    /// Advance construction by one tick and return the resulting status.
    ///
    /// A cost-1 facility completes on its first advance. Once operational,
    /// further calls change nothing.
    pub fn advance(&mut self) -> FacilityStatus {
        if self.status == FacilityStatus::UnderConstruction {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.status = FacilityStatus::Operational;
            }
        }
        self.status
    }

    /// The blueprint this facility was built from.
    #[must_use]
    pub fn blueprint(&self) -> &FacilityBlueprint {
        &self.blueprint
    }

    /// Name of the facility type.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.blueprint.name
    }

    /// Name of the owning settlement.
    #[must_use]
    pub fn settlement(&self) -> &str {
        &self.settlement
    }

    /// Current construction status.
    #[must_use]
    pub const fn status(&self) -> FacilityStatus {
        self.status
    }

    /// Ticks of work left until operational.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Check if construction has finished.
    #[must_use]
    pub const fn is_operational(&self) -> bool {
        matches!(self.status, FacilityStatus::Operational)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AxisScores, FacilityCategory};

    fn park() -> FacilityBlueprint {
        FacilityBlueprint::new(
            "Park",
            FacilityCategory::Environment,
            3,
            AxisScores::new(1, 0, 4),
        )
    }

    #[test]
    fn test_start_initializes_countdown() {
        let facility = Facility::start(park(), "Rivertown");
        assert_eq!(facility.status(), FacilityStatus::UnderConstruction);
        assert_eq!(facility.remaining(), 3);
        assert_eq!(facility.settlement(), "Rivertown");
        assert_eq!(facility.name(), "Park");
    }

    #[test]
    fn test_advance_to_completion() {
        let mut facility = Facility::start(park(), "Rivertown");

        assert_eq!(facility.advance(), FacilityStatus::UnderConstruction);
        assert_eq!(facility.remaining(), 2);
        assert_eq!(facility.advance(), FacilityStatus::UnderConstruction);
        assert_eq!(facility.advance(), FacilityStatus::Operational);
        assert_eq!(facility.remaining(), 0);
        assert!(facility.is_operational());
    }

    #[test]
    fn test_advance_is_idempotent_once_operational() {
        let mut facility = Facility::start(park(), "Rivertown");
        for _ in 0..3 {
            facility.advance();
        }
        assert!(facility.is_operational());

        // Extra advances change nothing
        assert_eq!(facility.advance(), FacilityStatus::Operational);
        assert_eq!(facility.remaining(), 0);
    }

    #[test]
    fn test_cost_one_completes_on_first_advance() {
        let blueprint = FacilityBlueprint::new(
            "Kiosk",
            FacilityCategory::Economy,
            1,
            AxisScores::new(0, 1, 0),
        );
        let mut facility = Facility::start(blueprint, "Rivertown");
        assert_eq!(facility.advance(), FacilityStatus::Operational);
    }
}
