//! Error types for the planning engine.

use thiserror::Error;

use crate::policy::SelectionError;

/// Result type alias using [`PlanningError`].
pub type Result<T> = std::result::Result<T, PlanningError>;

/// Top-level error type for all planning-engine errors.
///
/// Every variant is recoverable: the engine reports the failure to the
/// caller and leaves its state consistent. Presentation (printing,
/// logging to a user) is the driver's job, not this crate's.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// A selection policy could not pick a blueprint.
    #[error("Selection failed: {0}")]
    Selection(#[from] SelectionError),

    /// A value fell outside its accepted domain.
    #[error("Invalid {what}: {value}")]
    InvalidArgument {
        /// What kind of value was rejected.
        what: &'static str,
        /// The offending value, rendered for display.
        value: String,
    },

    /// A construction queue has no free slot.
    #[error("Construction capacity ({capacity}) reached for settlement '{settlement}'")]
    CapacityExceeded {
        /// Settlement whose plan is full.
        settlement: String,
        /// Capacity implied by the settlement kind.
        capacity: usize,
    },

    /// No settlement registered under the given name.
    #[error("Settlement not found: {0}")]
    SettlementNotFound(String),

    /// No plan registered under the given id.
    #[error("Plan not found: {0}")]
    PlanNotFound(u32),

    /// A settlement with the same name is already registered.
    #[error("Settlement already exists: {0}")]
    DuplicateSettlement(String),

    /// A blueprint with the same name is already in the catalog.
    #[error("Facility already exists: {0}")]
    DuplicateBlueprint(String),

    /// Plan state can only be adopted between plans for the same settlement.
    #[error("Cannot adopt plan state across settlements: '{ours}' vs '{theirs}'")]
    SettlementMismatch {
        /// Settlement of the receiving plan.
        ours: String,
        /// Settlement of the source plan.
        theirs: String,
    },
}
