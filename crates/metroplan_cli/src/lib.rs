//! Command-line driver for the planning engine.
//!
//! This crate wraps `metroplan_core` in a text interface:
//!
//! - A command language for declaring worlds and driving sessions
//! - Line-oriented config files and RON scenarios
//! - An interactive REPL with action log, backup and restore
//! - Batch runs emitting human or JSON-line reports
//!
//! # Example
//!
//! ```bash
//! # Interactive session
//! cargo run -p metroplan_cli -- repl
//!
//! # Batch run from a scenario, JSON output
//! cargo run -p metroplan_cli -- run --scenario demo.ron --steps 50 --json
//! ```

pub mod commands;
pub mod config;
pub mod report;
pub mod scenario;
pub mod session;

pub use commands::Command;
pub use report::RunReport;
pub use scenario::Scenario;
pub use session::{Outcome, Session};
