//! # Metroplan Core
//!
//! Deterministic city-planning simulation core.
//!
//! Settlements accumulate facilities over simulated steps according to
//! a pluggable selection policy, accruing scores across three axes:
//! life quality, economy and environment.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No randomness
//!
//! This separation enables:
//! - Scripted batch runs and CI verification
//! - Interactive drivers layered on top
//! - Cheap whole-world snapshots via `Clone`
//! - Reproducibility testing
//!
//! ## Crate Structure
//!
//! - [`catalog`] - Facility blueprints and the shared catalog
//! - [`facility`] - Construction instances and their countdown
//! - [`policy`] - The closed family of selection strategies
//! - [`settlement`] - Settlements and their construction capacity
//! - [`plan`] - The per-settlement construction state machine
//! - [`simulation`] - The registry and the per-step sweep

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod catalog;
pub mod error;
pub mod facility;
pub mod plan;
pub mod policy;
pub mod settlement;
pub mod simulation;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{AxisScores, FacilityBlueprint, FacilityCatalog, FacilityCategory};
    pub use crate::error::{PlanningError, Result};
    pub use crate::facility::{Facility, FacilityStatus};
    pub use crate::plan::{Plan, PlanStatus, StepEvents};
    pub use crate::policy::{PolicyKind, SelectionError, SelectionPolicy};
    pub use crate::settlement::{Settlement, SettlementKind};
    pub use crate::simulation::{FacilityEvent, Simulation, TickEvents};
}
