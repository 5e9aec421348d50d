//! Headless battle runner for scripted control and balance testing.
//!
//! This crate drives [`battle_core`] battles without any rendering:
//!
//! - **Interactive control**: JSON commands on stdin, responses on stdout
//! - **Scenarios**: RON files describing the field and starting units
//! - **Batch runs**: one scenario under many seeds, in parallel
//!
//! # Protocol
//!
//! Communication uses JSON lines (one JSON object per line):
//!
//! - **stdin**: Commands from controller (place, start, tick, query, etc.)
//! - **stdout**: Responses and battle state (JSON)
//! - **stderr**: Debug logs (human-readable)
//!
//! See [`protocol`] module for the full command/response format.
//!
//! # Example
//!
//! ```bash
//! # Run interactively
//! echo '{"cmd":"query"}' | cargo run -p battle_headless
//!
//! # Run a scenario to completion
//! cargo run -p battle_headless -- simulate --scenario scenarios/skirmish.ron
//!
//! # Run 1000 seeds of a scenario
//! cargo run -p battle_headless -- batch --scenario scenarios/skirmish.ron --count 1000
//! ```

pub mod batch;
pub mod protocol;
pub mod runner;
pub mod scenario;

pub use batch::{run_batch, run_battle, BatchConfig, BatchResults, BatchSummary, BattleSummary};
pub use protocol::{Command, Response};
pub use runner::{HeadlessConfig, HeadlessRunner};
pub use scenario::{Placement, Scenario, ScenarioError};
