//! Headless battle runner.
//!
//! This binary runs battles without graphics, controlled via JSON on stdin/stdout.
//! Designed for scripted controllers, CI testing, and balance runs.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode - read commands from stdin
//! cargo run -p battle_headless
//!
//! # Interactive mode starting from a scenario
//! cargo run -p battle_headless -- run --scenario scenarios/skirmish.ron
//!
//! # Run one battle to completion and print its summary
//! cargo run -p battle_headless -- simulate --scenario scenarios/skirmish.ron --seed 7
//!
//! # Run batch balance test
//! cargo run -p battle_headless -- batch --scenario scenarios/skirmish.ron --count 1000 --output results/batch.json
//! ```
//!
//! # Protocol
//!
//! Input (stdin): JSON commands, one per line
//! Output (stdout): JSON responses, one per line
//! Logs (stderr): Debug information
//!
//! See the protocol module for command/response format.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use battle_headless::{
    batch::{run_batch, run_battle, BatchConfig},
    runner::{HeadlessConfig, HeadlessRunner},
    scenario::Scenario,
};

#[derive(Parser)]
#[command(name = "battle_headless")]
#[command(about = "Headless battle runner for scripted control and balance testing")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive session over stdin/stdout
    Run {
        /// Scenario file to load (default: built-in skirmish setup)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Output state after every tick command
        #[arg(long)]
        auto_state: bool,
    },

    /// Run one battle to completion and print its summary
    Simulate {
        /// Scenario file to load (default: built-in skirmish)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Random seed (default: the scenario's)
        #[arg(long)]
        seed: Option<u64>,

        /// Pretty-print the summary
        #[arg(long)]
        pretty: bool,
    },

    /// Run a scenario under many seeds
    Batch {
        /// Scenario file to load (default: built-in skirmish)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Number of battles to run
        #[arg(short, long, default_value = "100")]
        count: u32,

        /// Worker threads (0 = auto)
        #[arg(short, long, default_value = "0")]
        parallel: usize,

        /// Starting random seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Write full results as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify determinism by running the same seed multiple times
    Verify {
        /// Scenario file to load (default: built-in skirmish)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Seed to verify
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for protocol)
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Some(Commands::Run {
            scenario,
            auto_state,
        }) => cmd_run(scenario.as_deref(), auto_state),
        Some(Commands::Simulate {
            scenario,
            seed,
            pretty,
        }) => cmd_simulate(scenario.as_deref(), seed, pretty),
        Some(Commands::Batch {
            scenario,
            count,
            parallel,
            seed,
            output,
        }) => cmd_batch(scenario.as_deref(), count, parallel, seed, output.as_deref()),
        Some(Commands::Verify {
            scenario,
            seed,
            runs,
        }) => cmd_verify(scenario.as_deref(), seed, runs),
        None => {
            // Default: interactive mode
            cmd_run(None, false);
        }
    }
}

/// Load a scenario file or fall back to the built-in skirmish.
fn load_scenario(path: Option<&Path>) -> Scenario {
    let Some(path) = path else {
        return Scenario::skirmish();
    };
    tracing::info!("Loading scenario from: {}", path.display());
    match Scenario::load(path) {
        Ok(scenario) => scenario,
        Err(e) => {
            tracing::error!(error = %e, path = %path.display(), "Failed to load scenario");
            std::process::exit(1);
        }
    }
}

/// Run a single interactive session
fn cmd_run(scenario: Option<&Path>, auto_state: bool) {
    tracing::info!("Starting interactive session");

    let config = HeadlessConfig {
        auto_state_output: auto_state,
    };
    let mut runner = match scenario {
        Some(_) => match HeadlessRunner::from_scenario(&load_scenario(scenario), config) {
            Ok(runner) => runner,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build scenario");
                std::process::exit(1);
            }
        },
        None => HeadlessRunner::new(battle_core::simulation::Battle::default(), config),
    };

    if let Err(e) = runner.run_stdio() {
        tracing::error!(error = %e, "I/O failure");
        std::process::exit(1);
    }
}

/// Run one battle and print its summary to stdout
fn cmd_simulate(scenario: Option<&Path>, seed: Option<u64>, pretty: bool) {
    let scenario = load_scenario(scenario);
    let seed = seed.unwrap_or(scenario.config.seed);

    let summary = match run_battle(&scenario, seed) {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(error = %e, "Battle failed");
            std::process::exit(1);
        }
    };

    let json = if pretty {
        serde_json::to_string_pretty(&summary)
    } else {
        serde_json::to_string(&summary)
    };
    match json {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize summary");
            std::process::exit(1);
        }
    }
}

/// Run batch of battles for balance testing
fn cmd_batch(scenario: Option<&Path>, count: u32, parallel: usize, seed: u64, output: Option<&Path>) {
    let scenario = load_scenario(scenario);
    let config = BatchConfig {
        count,
        seed_start: seed,
        parallel,
    };

    tracing::info!(
        scenario = %scenario.name,
        count,
        parallel,
        seed,
        max_ticks = scenario.max_ticks,
        "Batch configuration"
    );

    let results = run_batch(&scenario, config);

    if let Some(path) = output {
        if let Err(e) = results.save(path) {
            tracing::error!(error = %e, path = %path.display(), "Failed to save results");
            std::process::exit(1);
        }
        eprintln!("Results saved to: {}", path.display());
    }

    let summary = &results.summary;
    eprintln!("\n{}", "=".repeat(50));
    eprintln!("BATCH COMPLETE");
    eprintln!("{}", "=".repeat(50));
    eprintln!("Battles: {}", summary.total());
    if !results.errors.is_empty() {
        eprintln!("Battles FAILED: {}", results.errors.len());
    }
    eprintln!("Duration: {:.1}s", results.duration_seconds);
    eprintln!("Average length: {:.0} ticks", summary.average_ticks);
    eprintln!(
        "Player wins: {} ({:.1}%)",
        summary.player_wins,
        summary.win_rate(battle_core::components::Team::Player) * 100.0
    );
    eprintln!(
        "Enemy wins: {} ({:.1}%)",
        summary.enemy_wins,
        summary.win_rate(battle_core::components::Team::Enemy) * 100.0
    );
    eprintln!("Draws: {}", summary.draws);
    eprintln!("Timeouts: {}", summary.timeouts);

    for error in results.errors.iter().take(10) {
        eprintln!("  seed {}: {}", error.seed, error.message);
    }
    if results.errors.len() > 10 {
        eprintln!("  ... and {} more failures", results.errors.len() - 10);
    }
}

/// Verify determinism
fn cmd_verify(scenario: Option<&Path>, seed: u64, runs: u32) {
    let scenario = load_scenario(scenario);
    tracing::info!(
        "Verifying determinism: {} with seed {} ({} runs)",
        scenario.name,
        seed,
        runs
    );

    let mut hashes = Vec::new();
    for _ in 0..runs.max(1) {
        match run_battle(&scenario, seed) {
            Ok(summary) => hashes.push(summary.state_hash),
            Err(e) => {
                tracing::error!(error = %e, "Battle failed");
                std::process::exit(1);
            }
        }
    }

    if hashes.windows(2).all(|pair| pair[0] == pair[1]) {
        eprintln!("PASS: All {} runs produced identical results", runs);
        eprintln!("  State hash: {:016x}", hashes[0]);
    } else {
        eprintln!("FAIL: Non-determinism detected!");
        for (i, hash) in hashes.iter().enumerate() {
            eprintln!("  Run {}: {:016x}", i + 1, hash);
        }
        std::process::exit(1);
    }
}
