//! Line-oriented configuration files.
//!
//! A config file declares the initial world: settlements, facility
//! blueprints and plans, one declaration command per line in the
//! command language. Session commands (`step`, `backup`, ...) are
//! rejected; the file describes a world, it does not drive one.

use std::path::Path;

use metroplan_core::error::PlanningError;
use metroplan_core::policy::SelectionPolicy;
use metroplan_core::settlement::Settlement;
use metroplan_core::simulation::Simulation;
use thiserror::Error;

use crate::commands::{Command, CommandParseError};

/// Error type for configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found.
    #[error("Config file not found: {0}")]
    FileNotFound(String),
    /// Failed to read the file.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// A line failed to parse.
    #[error("Line {line}: {source}")]
    ParseError {
        /// 1-based line number.
        line: usize,
        /// The underlying parse failure.
        #[source]
        source: CommandParseError,
    },
    /// A session command appeared in a file.
    #[error("Line {line}: '{command}' is not allowed in config files")]
    NotADeclaration {
        /// 1-based line number.
        line: usize,
        /// The rejected command word.
        command: String,
    },
}

/// Parse configuration text into declaration commands.
pub fn parse_config(text: &str) -> Result<Vec<Command>, ConfigError> {
    let mut commands = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        match Command::parse(line) {
            Ok(None) => {}
            Ok(Some(command)) if command.is_declaration() => commands.push(command),
            Ok(Some(command)) => {
                return Err(ConfigError::NotADeclaration {
                    line: line_number,
                    command: command.name().to_string(),
                })
            }
            Err(source) => {
                return Err(ConfigError::ParseError {
                    line: line_number,
                    source,
                })
            }
        }
    }
    Ok(commands)
}

/// Load declaration commands from a config file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Vec<Command>, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Build a fresh simulation from declaration commands.
///
/// Declarations apply in file order, so plans can only reference
/// settlements declared above them.
pub fn build_simulation(commands: &[Command]) -> Result<Simulation, PlanningError> {
    let mut sim = Simulation::new();
    for command in commands {
        match command {
            Command::Settlement { name, kind } => {
                sim.add_settlement(Settlement::new(name.clone(), *kind))?;
            }
            Command::Facility { blueprint } => {
                sim.add_blueprint(blueprint.clone())?;
            }
            Command::Plan { settlement, policy } => {
                sim.add_plan(settlement, SelectionPolicy::from_id(policy)?)?;
            }
            // parse_config only emits declarations
            _ => {}
        }
    }
    tracing::debug!(
        settlements = sim.settlements().len(),
        facilities = sim.catalog().len(),
        plans = sim.plans().len(),
        "world built from config"
    );
    Ok(sim)
}
