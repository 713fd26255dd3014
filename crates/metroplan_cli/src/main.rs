//! Command-line entry point for the metroplan planning engine.
//!
//! # Usage
//!
//! ```bash
//! # Interactive session on stdin/stdout
//! cargo run -p metroplan_cli -- repl
//!
//! # Batch run from a config file
//! cargo run -p metroplan_cli -- run --config city.plan --steps 50
//!
//! # Batch run from a RON scenario with JSON output
//! cargo run -p metroplan_cli -- run --scenario demo.ron --steps 50 --json
//!
//! # Validate a world file without stepping it
//! cargo run -p metroplan_cli -- check --config city.plan
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use metroplan_cli::config;
use metroplan_cli::report::RunReport;
use metroplan_cli::scenario::Scenario;
use metroplan_cli::session::Session;
use metroplan_core::simulation::Simulation;

#[derive(Parser)]
#[command(name = "metroplan")]
#[command(about = "Turn-based city planning simulation", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a batch simulation and print the final report
    Run {
        /// Line-oriented config file declaring the world
        #[arg(short, long, conflicts_with = "scenario")]
        config: Option<PathBuf>,

        /// RON scenario file declaring the world
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Number of steps to simulate
        #[arg(long, default_value = "10")]
        steps: u64,

        /// Emit the report as a single JSON line
        #[arg(long)]
        json: bool,
    },

    /// Interactive session reading commands from stdin
    Repl {
        /// Config file applied before the first command
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Parse and validate a world file without stepping it
    Check {
        /// Line-oriented config file
        #[arg(short, long, conflicts_with = "scenario")]
        config: Option<PathBuf>,

        /// RON scenario file
        #[arg(short, long)]
        scenario: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Some(Commands::Run {
            config,
            scenario,
            steps,
            json,
        }) => cmd_run(config.as_deref(), scenario.as_deref(), steps, json),
        Some(Commands::Repl { config }) => cmd_repl(config.as_deref()),
        Some(Commands::Check { config, scenario }) => {
            cmd_check(config.as_deref(), scenario.as_deref());
        }
        None => cmd_repl(None),
    }
}

/// Build the initial world from whichever source was given.
///
/// With neither a config nor a scenario, falls back to the built-in
/// demo scenario.
fn load_world(config: Option<&Path>, scenario: Option<&Path>) -> Result<Simulation, String> {
    match (config, scenario) {
        (Some(path), _) => {
            let commands =
                config::load_config(path).map_err(|e| format!("Failed to load config: {e}"))?;
            config::build_simulation(&commands).map_err(|e| format!("Invalid config: {e}"))
        }
        (None, Some(path)) => {
            let scenario =
                Scenario::load(path).map_err(|e| format!("Failed to load scenario: {e}"))?;
            scenario.build().map_err(|e| format!("Invalid scenario: {e}"))
        }
        (None, None) => {
            tracing::info!("no world file given, using the demo scenario");
            Scenario::demo()
                .build()
                .map_err(|e| format!("Invalid scenario: {e}"))
        }
    }
}

fn cmd_run(config: Option<&Path>, scenario: Option<&Path>, steps: u64, json: bool) {
    let mut sim = match load_world(config, scenario) {
        Ok(sim) => sim,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    };

    tracing::info!(steps, "starting batch run");
    for completed in 0..steps {
        if let Err(err) = sim.step() {
            eprintln!("Simulation failed at step {}: {err}", completed + 1);
            std::process::exit(1);
        }
    }

    if json {
        println!("{}", RunReport::from_simulation(&sim).to_json_line());
    } else {
        println!("{}", "=".repeat(50));
        println!("RUN COMPLETE");
        println!("{}", "=".repeat(50));
        for plan in sim.plans() {
            println!("{plan}");
        }
        println!("total steps: {}", sim.tick());
        println!("state hash: {:016x}", sim.state_hash());
    }
}

fn cmd_repl(config: Option<&Path>) {
    let sim = match config {
        Some(path) => match load_world(Some(path), None) {
            Ok(sim) => sim,
            Err(message) => {
                eprintln!("{message}");
                std::process::exit(1);
            }
        },
        None => Simulation::new(),
    };

    tracing::info!("starting interactive session");
    let mut session = Session::with_simulation(sim);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    if let Err(err) = session.run(stdin.lock(), stdout.lock()) {
        eprintln!("Session failed: {err}");
        std::process::exit(1);
    }
}

fn cmd_check(config: Option<&Path>, scenario: Option<&Path>) {
    if config.is_none() && scenario.is_none() {
        eprintln!("Nothing to check: pass --config or --scenario");
        std::process::exit(1);
    }

    match load_world(config, scenario) {
        Ok(sim) => {
            println!(
                "OK: {} settlements, {} facilities, {} plans",
                sim.settlements().len(),
                sim.catalog().len(),
                sim.plans().len()
            );
        }
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    }
}
