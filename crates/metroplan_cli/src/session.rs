//! Interactive planning sessions.
//!
//! A [`Session`] owns a live simulation, a single in-memory backup
//! slot and the action log. Every executed command is appended to the
//! log with its outcome; `backup` and `restore` snapshot and rewind
//! the simulation without touching the log, so the record always shows
//! what the user actually did.

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use metroplan_core::error::PlanningError;
use metroplan_core::policy::SelectionPolicy;
use metroplan_core::settlement::Settlement;
use metroplan_core::simulation::Simulation;
use thiserror::Error;

use crate::commands::Command;

/// Error type for session command execution.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The planning engine rejected the operation.
    #[error(transparent)]
    Planning(#[from] PlanningError),
    /// `restore` without a prior `backup`.
    #[error("No backup to restore")]
    NoBackup,
    /// `changePolicy` naming the policy the plan already follows.
    #[error("Plan {plan} already follows policy '{policy}'")]
    PolicyUnchanged {
        /// The targeted plan id.
        plan: u32,
        /// The redundant policy id.
        policy: String,
    },
    /// A command arrived after `close`.
    #[error("Session is closed")]
    Closed,
}

/// Whether a logged action completed or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    /// The command executed without error.
    Completed,
    /// The command was rejected.
    Error,
}

/// One entry in the action log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    /// Canonical text of the executed command.
    pub command: String,
    /// How the command ended.
    pub status: ActionStatus,
}

impl std::fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self.status {
            ActionStatus::Completed => "COMPLETED",
            ActionStatus::Error => "ERROR",
        };
        write!(f, "{} {}", self.command, status)
    }
}

/// Result of a successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Command succeeded with nothing to print.
    Done,
    /// Command produced text for the user.
    Show(String),
    /// `close` ran: the final summary, and the session is over.
    Closed(String),
}

/// An interactive planning session.
#[derive(Debug, Clone)]
pub struct Session {
    sim: Simulation,
    backup: Option<Simulation>,
    log: Vec<ActionRecord>,
    closed: bool,
}

impl Session {
    /// Create a session over an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::with_simulation(Simulation::new())
    }

    /// Create a session over a prepared world (config or scenario).
    #[must_use]
    pub fn with_simulation(sim: Simulation) -> Self {
        Self {
            sim,
            backup: None,
            log: Vec::new(),
            closed: false,
        }
    }

    /// The live simulation.
    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// The action log, oldest first.
    pub fn log(&self) -> &[ActionRecord] {
        &self.log
    }

    /// Whether `close` has run.
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Execute one command and record it in the action log.
    ///
    /// The record is appended after execution, so a `log` command
    /// never lists itself. A closed session rejects everything and
    /// records nothing.
    pub fn execute(&mut self, command: Command) -> Result<Outcome, SessionError> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        let text = command.to_string();
        let result = self.dispatch(&command);
        let status = if result.is_ok() {
            ActionStatus::Completed
        } else {
            ActionStatus::Error
        };
        self.log.push(ActionRecord {
            command: text,
            status,
        });
        result
    }

    fn dispatch(&mut self, command: &Command) -> Result<Outcome, SessionError> {
        match command {
            Command::Settlement { name, kind } => {
                self.sim.add_settlement(Settlement::new(name.clone(), *kind))?;
                Ok(Outcome::Done)
            }
            Command::Facility { blueprint } => {
                self.sim.add_blueprint(blueprint.clone())?;
                Ok(Outcome::Done)
            }
            Command::Plan { settlement, policy } => {
                let policy = SelectionPolicy::from_id(policy)?;
                self.sim.add_plan(settlement, policy)?;
                Ok(Outcome::Done)
            }
            Command::Step { count } => {
                // Completed steps stand even if a later one fails.
                for _ in 0..*count {
                    self.sim.step()?;
                }
                Ok(Outcome::Done)
            }
            Command::PlanStatus { plan } => {
                let plan = self.sim.plan(*plan)?;
                Ok(Outcome::Show(plan.to_string()))
            }
            Command::ChangePolicy { plan, policy } => {
                let incoming = SelectionPolicy::from_id(policy)?;
                let target = self.sim.plan_mut(*plan)?;
                if target.policy().id() == incoming.id() {
                    return Err(SessionError::PolicyUnchanged {
                        plan: *plan,
                        policy: policy.clone(),
                    });
                }
                target.set_policy(incoming);
                Ok(Outcome::Done)
            }
            Command::Log => {
                let mut out = String::new();
                for record in &self.log {
                    let _ = writeln!(out, "{record}");
                }
                Ok(Outcome::Show(out.trim_end().to_string()))
            }
            Command::Backup => {
                self.backup = Some(self.sim.clone());
                tracing::debug!(tick = self.sim.tick(), "simulation backed up");
                Ok(Outcome::Done)
            }
            Command::Restore => {
                let snapshot = self.backup.as_ref().ok_or(SessionError::NoBackup)?;
                self.sim = snapshot.clone();
                tracing::debug!(tick = self.sim.tick(), "simulation restored");
                Ok(Outcome::Done)
            }
            Command::Close => {
                self.closed = true;
                tracing::info!(tick = self.sim.tick(), "session closed");
                Ok(Outcome::Closed(self.summary()))
            }
        }
    }

    /// Final per-plan report printed by `close`.
    fn summary(&self) -> String {
        let mut out = String::new();
        for plan in self.sim.plans() {
            let _ = writeln!(out, "{plan}");
        }
        let _ = write!(out, "total steps: {}", self.sim.tick());
        out
    }

    /// Drive the session from a line stream.
    ///
    /// Blank lines and `#` comments are skipped. Parse and execution
    /// errors are printed as `Error: <reason>` and the loop continues;
    /// `close` prints the summary and ends the loop. End of input ends
    /// the loop without a summary.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> std::io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    writeln!(output, "Error: {err}")?;
                    continue;
                }
            };
            match self.execute(command) {
                Ok(Outcome::Done) => {}
                Ok(Outcome::Show(text)) => writeln!(output, "{text}")?,
                Ok(Outcome::Closed(text)) => {
                    writeln!(output, "{text}")?;
                    break;
                }
                Err(err) => writeln!(output, "Error: {err}")?,
            }
        }
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
