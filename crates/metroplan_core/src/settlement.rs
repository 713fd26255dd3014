//! Settlements and their construction capacity.

use serde::{Deserialize, Serialize};

use crate::error::{PlanningError, Result};

/// Kind of settlement, which determines how many facilities can be
/// under construction at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementKind {
    /// One concurrent construction slot.
    Village,
    /// Two concurrent construction slots.
    City,
    /// Three concurrent construction slots.
    Metropolis,
}

impl SettlementKind {
    /// Resolve a kind from its configuration index.
    ///
    /// Accepted values are 0 (village), 1 (city) and 2 (metropolis).
    pub fn from_index(index: u32) -> Result<Self> {
        match index {
            0 => Ok(Self::Village),
            1 => Ok(Self::City),
            2 => Ok(Self::Metropolis),
            other => Err(PlanningError::InvalidArgument {
                what: "settlement kind",
                value: other.to_string(),
            }),
        }
    }

    /// Configuration index of this kind.
    #[must_use]
    pub const fn as_index(self) -> u32 {
        match self {
            Self::Village => 0,
            Self::City => 1,
            Self::Metropolis => 2,
        }
    }

    /// Number of facilities this settlement can build concurrently.
    #[must_use]
    pub const fn capacity(self) -> usize {
        match self {
            Self::Village => 1,
            Self::City => 2,
            Self::Metropolis => 3,
        }
    }
}

impl std::fmt::Display for SettlementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Village => write!(f, "village"),
            Self::City => write!(f, "city"),
            Self::Metropolis => write!(f, "metropolis"),
        }
    }
}

/// A settlement registered with the simulation.
///
/// Equality is structural (same name, same kind). Plans hold value
/// copies, so two plans for the same settlement compare equal on it
/// without sharing storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Settlement {
    /// Unique name, the registry key.
    name: String,
    /// Kind determining construction capacity.
    kind: SettlementKind,
}

impl Settlement {
    /// Create a new settlement.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SettlementKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Name of the settlement.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of the settlement.
    #[must_use]
    pub const fn kind(&self) -> SettlementKind {
        self.kind
    }

    /// Concurrent construction capacity, derived from the kind.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.kind.capacity()
    }
}

impl std::fmt::Display for Settlement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}
