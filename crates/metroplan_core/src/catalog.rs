//! Facility blueprints and the shared catalog.
//!
//! Blueprints are data-driven definitions ingested once at configuration
//! time and never mutated afterwards. Plans copy a blueprint by value when
//! construction starts, so catalog growth between ticks never touches
//! facilities already in flight.
//!
//! All score arithmetic is plain integer math for deterministic simulation.

use serde::{Deserialize, Serialize};

use crate::error::{PlanningError, Result};

/// Category a facility counts towards.
///
/// Specialized selection policies only pick blueprints of their category;
/// the configuration surface refers to categories by index (0, 1, 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacilityCategory {
    /// Housing, healthcare, education.
    LifeQuality,
    /// Industry and commerce.
    Economy,
    /// Parks, clean power, waste treatment.
    Environment,
}

impl FacilityCategory {
    /// Resolve a category from its configuration index.
    ///
    /// Accepted values are 0 (life quality), 1 (economy) and 2 (environment).
    pub fn from_index(index: u32) -> Result<Self> {
        match index {
            0 => Ok(Self::LifeQuality),
            1 => Ok(Self::Economy),
            2 => Ok(Self::Environment),
            other => Err(PlanningError::InvalidArgument {
                what: "facility category",
                value: other.to_string(),
            }),
        }
    }

    /// Configuration index of this category.
    #[must_use]
    pub const fn as_index(self) -> u32 {
        match self {
            Self::LifeQuality => 0,
            Self::Economy => 1,
            Self::Environment => 2,
        }
    }
}

impl std::fmt::Display for FacilityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LifeQuality => write!(f, "life quality"),
            Self::Economy => write!(f, "economy"),
            Self::Environment => write!(f, "environment"),
        }
    }
}

/// Score values across the three planning axes.
///
/// Used both for per-blueprint impact deltas and for accumulated plan
/// totals. Negative values are legal: a factory can boost the economy
/// while degrading the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AxisScores {
    /// Life-quality axis.
    pub life_quality: i32,
    /// Economy axis.
    pub economy: i32,
    /// Environment axis.
    pub environment: i32,
}

impl AxisScores {
    /// All three axes at zero.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Create a score triple.
    #[must_use]
    pub const fn new(life_quality: i32, economy: i32, environment: i32) -> Self {
        Self {
            life_quality,
            economy,
            environment,
        }
    }

    /// Distance between the highest and lowest axis.
    ///
    /// The balanced selection policy minimizes this value.
    #[must_use]
    pub const fn spread(self) -> i32 {
        let mut max = self.life_quality;
        if self.economy > max {
            max = self.economy;
        }
        if self.environment > max {
            max = self.environment;
        }
        let mut min = self.life_quality;
        if self.economy < min {
            min = self.economy;
        }
        if self.environment < min {
            min = self.environment;
        }
        max - min
    }
}

impl std::ops::Add for AxisScores {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            life_quality: self.life_quality + rhs.life_quality,
            economy: self.economy + rhs.economy,
            environment: self.environment + rhs.environment,
        }
    }
}

impl std::ops::AddAssign for AxisScores {
    fn add_assign(&mut self, rhs: Self) {
        self.life_quality += rhs.life_quality;
        self.economy += rhs.economy;
        self.environment += rhs.environment;
    }
}

/// Blueprint defining a facility type's properties.
///
/// The name is the lookup key within a catalog. `cost` doubles as the
/// construction duration: one cost unit is worked off per tick.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacilityBlueprint {
    /// Unique display name of the facility type.
    pub name: String,
    /// Category this facility counts towards.
    pub category: FacilityCategory,
    /// Build cost in ticks.
    pub cost: u32,
    /// Score deltas applied when construction completes.
    pub impact: AxisScores,
}

impl FacilityBlueprint {
    /// Create a new facility blueprint.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        category: FacilityCategory,
        cost: u32,
        impact: AxisScores,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            cost,
            impact,
        }
    }
}

/// Ordered, grow-only registry of facility blueprints.
///
/// Entry order is insertion order and is load-bearing: round-robin
/// policies walk it with a cursor and the balanced policy breaks ties
/// towards the earliest entry. Removal is deliberately not offered;
/// in-flight facilities hold value copies, so entries must stay put.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacilityCatalog {
    /// Blueprints in registration order.
    entries: Vec<FacilityBlueprint>,
}

impl FacilityCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a blueprint.
    ///
    /// Rejects duplicate names and zero costs; a zero-cost facility would
    /// never occupy a construction slot.
    pub fn register(&mut self, blueprint: FacilityBlueprint) -> Result<()> {
        if blueprint.cost == 0 {
            return Err(PlanningError::InvalidArgument {
                what: "facility cost",
                value: "0".to_string(),
            });
        }
        if self.contains(&blueprint.name) {
            return Err(PlanningError::DuplicateBlueprint(blueprint.name));
        }
        self.entries.push(blueprint);
        Ok(())
    }

    /// Look up a blueprint by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FacilityBlueprint> {
        self.entries.iter().find(|b| b.name == name)
    }

    /// Check whether a blueprint with the given name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of registered blueprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All blueprints in registration order.
    #[must_use]
    pub fn entries(&self) -> &[FacilityBlueprint] {
        &self.entries
    }

    /// Iterate over blueprints in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &FacilityBlueprint> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_index_round_trip() {
        for index in 0..3 {
            let category = FacilityCategory::from_index(index).unwrap();
            assert_eq!(category.as_index(), index);
        }
    }

    #[test]
    fn test_category_index_out_of_range() {
        let result = FacilityCategory::from_index(3);
        assert!(matches!(
            result,
            Err(PlanningError::InvalidArgument { what, .. }) if what == "facility category"
        ));
    }

    #[test]
    fn test_axis_scores_add() {
        let mut total = AxisScores::new(1, 2, 3);
        total += AxisScores::new(10, -2, 0);
        assert_eq!(total, AxisScores::new(11, 0, 3));

        let sum = total + AxisScores::new(-1, 1, -1);
        assert_eq!(sum, AxisScores::new(10, 1, 2));
    }

    #[test]
    fn test_axis_scores_spread() {
        assert_eq!(AxisScores::ZERO.spread(), 0);
        assert_eq!(AxisScores::new(5, 5, 5).spread(), 0);
        assert_eq!(AxisScores::new(1, 4, 2).spread(), 3);
        assert_eq!(AxisScores::new(-3, 0, 2).spread(), 5);
    }

    #[test]
    fn test_catalog_register_and_lookup() {
        let mut catalog = FacilityCatalog::new();
        assert!(catalog.is_empty());

        catalog
            .register(FacilityBlueprint::new(
                "Clinic",
                FacilityCategory::LifeQuality,
                2,
                AxisScores::new(3, 0, 0),
            ))
            .unwrap();
        catalog
            .register(FacilityBlueprint::new(
                "Factory",
                FacilityCategory::Economy,
                4,
                AxisScores::new(0, 5, -2),
            ))
            .unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("Clinic"));
        assert_eq!(catalog.get("Factory").unwrap().cost, 4);
        assert!(catalog.get("Harbor").is_none());

        // Registration order is preserved
        let names: Vec<_> = catalog.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Clinic", "Factory"]);
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let mut catalog = FacilityCatalog::new();
        let clinic = FacilityBlueprint::new(
            "Clinic",
            FacilityCategory::LifeQuality,
            2,
            AxisScores::new(3, 0, 0),
        );
        catalog.register(clinic.clone()).unwrap();

        let result = catalog.register(clinic);
        assert!(matches!(result, Err(PlanningError::DuplicateBlueprint(name)) if name == "Clinic"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_catalog_rejects_zero_cost() {
        let mut catalog = FacilityCatalog::new();
        let result = catalog.register(FacilityBlueprint::new(
            "Ghost",
            FacilityCategory::Economy,
            0,
            AxisScores::ZERO,
        ));
        assert!(matches!(
            result,
            Err(PlanningError::InvalidArgument { what, .. }) if what == "facility cost"
        ));
        assert!(catalog.is_empty());
    }
}
