//! The line-oriented command language.
//!
//! One command per line, whitespace separated. Blank lines and `#`
//! comments are skipped. Configuration files accept only the three
//! declaration commands; the interactive session accepts all of them.
//!
//! ```text
//! settlement <name> <kind-index>
//! facility <name> <category-index> <cost> <lq> <eco> <env>
//! plan <settlement> <policy-id>
//! step <n>
//! planStatus <plan-id>
//! changePolicy <plan-id> <policy-id>
//! log
//! backup
//! restore
//! close
//! ```
//!
//! Kind and category indices follow the core converters (0, 1, 2);
//! policy ids are the short identifiers `nve`, `bal`, `eco`, `env`.

use metroplan_core::catalog::{AxisScores, FacilityBlueprint, FacilityCategory};
use metroplan_core::error::PlanningError;
use metroplan_core::policy::SelectionPolicy;
use metroplan_core::settlement::SettlementKind;
use thiserror::Error;

/// Error type for command parsing.
#[derive(Error, Debug)]
pub enum CommandParseError {
    /// The first token is not a known command word.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    /// Known command with the wrong argument shape.
    #[error("Usage: {0}")]
    Usage(&'static str),
    /// An argument failed numeric parsing.
    #[error("Invalid number '{value}' for {what}")]
    InvalidNumber {
        /// What the number was supposed to be.
        what: &'static str,
        /// The offending token.
        value: String,
    },
    /// An argument failed domain validation (index or policy id).
    #[error(transparent)]
    Invalid(#[from] PlanningError),
}

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register a settlement.
    Settlement {
        /// Unique settlement name.
        name: String,
        /// Settlement kind, from its configuration index.
        kind: SettlementKind,
    },
    /// Register a facility blueprint in the shared catalog.
    Facility {
        /// The parsed blueprint.
        blueprint: FacilityBlueprint,
    },
    /// Create a construction plan for a settlement.
    Plan {
        /// Settlement the plan builds for.
        settlement: String,
        /// Validated policy id.
        policy: String,
    },
    /// Advance the simulation by N steps.
    Step {
        /// Number of steps to run.
        count: u64,
    },
    /// Print the status dump of one plan.
    PlanStatus {
        /// Plan id.
        plan: u32,
    },
    /// Replace a plan's selection policy.
    ChangePolicy {
        /// Plan id.
        plan: u32,
        /// Validated policy id to install.
        policy: String,
    },
    /// Print the action log.
    Log,
    /// Snapshot the whole simulation in memory.
    Backup,
    /// Replace the simulation with the held snapshot.
    Restore,
    /// Print the final summary and end the session.
    Close,
}

impl Command {
    /// Parse one input line.
    ///
    /// Returns `Ok(None)` for blank lines and `#` comments. Indices and
    /// policy ids are validated here, so a parsed command can only fail
    /// against simulation state, never against its own arguments.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandParseError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let command = match tokens.as_slice() {
            [] => return Ok(None),

            ["settlement", name, kind] => Self::Settlement {
                name: (*name).to_string(),
                kind: SettlementKind::from_index(parse_number(kind, "settlement kind")?)?,
            },
            ["settlement", ..] => {
                return Err(CommandParseError::Usage("settlement <name> <kind-index>"))
            }

            ["facility", name, category, cost, lq, eco, env] => Self::Facility {
                blueprint: FacilityBlueprint::new(
                    *name,
                    FacilityCategory::from_index(parse_number(category, "facility category")?)?,
                    parse_number(cost, "facility cost")?,
                    AxisScores::new(
                        parse_number(lq, "life quality impact")?,
                        parse_number(eco, "economy impact")?,
                        parse_number(env, "environment impact")?,
                    ),
                ),
            },
            ["facility", ..] => {
                return Err(CommandParseError::Usage(
                    "facility <name> <category-index> <cost> <lq> <eco> <env>",
                ))
            }

            ["plan", settlement, policy] => {
                SelectionPolicy::from_id(policy)?;
                Self::Plan {
                    settlement: (*settlement).to_string(),
                    policy: (*policy).to_string(),
                }
            }
            ["plan", ..] => return Err(CommandParseError::Usage("plan <settlement> <policy-id>")),

            ["step", count] => Self::Step {
                count: parse_number(count, "step count")?,
            },
            ["step", ..] => return Err(CommandParseError::Usage("step <n>")),

            ["planStatus", plan] => Self::PlanStatus {
                plan: parse_number(plan, "plan id")?,
            },
            ["planStatus", ..] => return Err(CommandParseError::Usage("planStatus <plan-id>")),

            ["changePolicy", plan, policy] => {
                SelectionPolicy::from_id(policy)?;
                Self::ChangePolicy {
                    plan: parse_number(plan, "plan id")?,
                    policy: (*policy).to_string(),
                }
            }
            ["changePolicy", ..] => {
                return Err(CommandParseError::Usage("changePolicy <plan-id> <policy-id>"))
            }

            ["log"] => Self::Log,
            ["backup"] => Self::Backup,
            ["restore"] => Self::Restore,
            ["close"] => Self::Close,
            ["log" | "backup" | "restore" | "close", ..] => {
                return Err(CommandParseError::Usage("this command takes no arguments"))
            }

            [other, ..] => return Err(CommandParseError::UnknownCommand((*other).to_string())),
        };
        Ok(Some(command))
    }

    /// Command word, as written in the language.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Settlement { .. } => "settlement",
            Self::Facility { .. } => "facility",
            Self::Plan { .. } => "plan",
            Self::Step { .. } => "step",
            Self::PlanStatus { .. } => "planStatus",
            Self::ChangePolicy { .. } => "changePolicy",
            Self::Log => "log",
            Self::Backup => "backup",
            Self::Restore => "restore",
            Self::Close => "close",
        }
    }

    /// Whether configuration files accept this command.
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            Self::Settlement { .. } | Self::Facility { .. } | Self::Plan { .. }
        )
    }
}

/// Canonical single-line form, as recorded in the action log.
impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Settlement { name, kind } => {
                write!(f, "settlement {} {}", name, kind.as_index())
            }
            Self::Facility { blueprint } => write!(
                f,
                "facility {} {} {} {} {} {}",
                blueprint.name,
                blueprint.category.as_index(),
                blueprint.cost,
                blueprint.impact.life_quality,
                blueprint.impact.economy,
                blueprint.impact.environment,
            ),
            Self::Plan { settlement, policy } => write!(f, "plan {settlement} {policy}"),
            Self::Step { count } => write!(f, "step {count}"),
            Self::PlanStatus { plan } => write!(f, "planStatus {plan}"),
            Self::ChangePolicy { plan, policy } => write!(f, "changePolicy {plan} {policy}"),
            Self::Log => write!(f, "log"),
            Self::Backup => write!(f, "backup"),
            Self::Restore => write!(f, "restore"),
            Self::Close => write!(f, "close"),
        }
    }
}

fn parse_number<T: std::str::FromStr>(
    token: &str,
    what: &'static str,
) -> Result<T, CommandParseError> {
    token.parse().map_err(|_| CommandParseError::InvalidNumber {
        what,
        value: token.to_string(),
    })
}
