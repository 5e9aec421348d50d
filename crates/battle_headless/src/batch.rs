//! Batch battle runner.
//!
//! Runs one scenario under many seeds in parallel using rayon. Each battle
//! is single-threaded and owns its roster, so runs are independent.

use std::path::Path;
use std::time::Instant;

use battle_core::components::Team;
use battle_core::simulation::{Battle, Outcome};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::scenario::{Scenario, ScenarioError};

/// Configuration for a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of battles to run.
    pub count: u32,
    /// Seed of the first battle; later battles count up from it.
    pub seed_start: u64,
    /// Worker threads (0 = rayon default).
    pub parallel: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            count: 100,
            seed_start: 0,
            parallel: 0,
        }
    }
}

/// What happened in one battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSummary {
    /// Seed used.
    pub seed: u64,
    /// Outcome, or `None` if the tick limit was reached first.
    pub outcome: Option<Outcome>,
    /// Ticks run.
    pub ticks: u64,
    /// Living player units at the end.
    pub player_survivors: usize,
    /// Living enemy units at the end.
    pub enemy_survivors: usize,
    /// Total health removed by damage.
    pub damage_dealt: f32,
    /// Units killed.
    pub deaths: usize,
    /// Units created by producers.
    pub spawned: usize,
    /// Final state hash.
    pub state_hash: u64,
}

/// Run one battle of `scenario` to completion or its tick limit.
pub fn run_battle(scenario: &Scenario, seed: u64) -> Result<BattleSummary, ScenarioError> {
    let mut battle = scenario.build_battle(Some(seed))?;
    battle.start();

    let (mut damage_dealt, mut deaths, mut spawned) = (0.0, 0, 0);
    while battle.is_running() && battle.current_tick() < scenario.max_ticks {
        let events = battle.tick();
        damage_dealt += events.damage.iter().map(|d| d.amount).sum::<f32>();
        deaths += events.deaths.len();
        spawned += events.spawned.len();
    }

    let summary = summarize(&battle, seed, damage_dealt, deaths, spawned);
    debug!(seed, ticks = summary.ticks, outcome = ?summary.outcome, "Battle complete");
    Ok(summary)
}

fn summarize(battle: &Battle, seed: u64, damage_dealt: f32, deaths: usize, spawned: usize) -> BattleSummary {
    BattleSummary {
        seed,
        outcome: battle.outcome(),
        ticks: battle.current_tick(),
        player_survivors: battle.roster().living_count(Team::Player),
        enemy_survivors: battle.roster().living_count(Team::Enemy),
        damage_dealt,
        deaths,
        spawned,
        state_hash: battle.state_hash(),
    }
}

/// Aggregate results over a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Battles won by the player.
    pub player_wins: u32,
    /// Battles won by the enemy.
    pub enemy_wins: u32,
    /// Battles where both sides died.
    pub draws: u32,
    /// Battles stopped at the tick limit.
    pub timeouts: u32,
    /// Mean battle length in ticks.
    pub average_ticks: f64,
}

impl BatchSummary {
    /// Tally a set of battles.
    #[must_use]
    pub fn from_games(games: &[BattleSummary]) -> Self {
        let mut summary = Self::default();
        for game in games {
            match game.outcome {
                Some(Outcome::Victory(Team::Player)) => summary.player_wins += 1,
                Some(Outcome::Victory(Team::Enemy)) => summary.enemy_wins += 1,
                Some(Outcome::Draw) => summary.draws += 1,
                None => summary.timeouts += 1,
            }
        }
        if !games.is_empty() {
            summary.average_ticks = games.iter().map(|g| g.ticks as f64).sum::<f64>() / games.len() as f64;
        }
        summary
    }

    /// Battles counted.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.player_wins + self.enemy_wins + self.draws + self.timeouts
    }

    /// Share of battles won by `team`.
    #[must_use]
    pub fn win_rate(&self, team: Team) -> f64 {
        let wins = match team {
            Team::Player => self.player_wins,
            Team::Enemy => self.enemy_wins,
        };
        f64::from(wins) / f64::from(self.total().max(1))
    }
}

/// Error during a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchError {
    /// Seed used.
    pub seed: u64,
    /// Error message.
    pub message: String,
}

/// Results from a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    /// Scenario name.
    pub scenario: String,
    /// Configuration used.
    pub config: BatchConfig,
    /// Individual battles, in seed order.
    pub games: Vec<BattleSummary>,
    /// Aggregate summary.
    pub summary: BatchSummary,
    /// Total runtime.
    pub duration_seconds: f64,
    /// Errors encountered.
    pub errors: Vec<BatchError>,
}

impl BatchResults {
    /// Save results to a JSON file.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Load results from a JSON file.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(std::io::Error::other)
    }
}

/// Run `config.count` battles of `scenario` in parallel.
pub fn run_batch(scenario: &Scenario, config: BatchConfig) -> BatchResults {
    let start = Instant::now();
    info!(scenario = %scenario.name, count = config.count, "Starting batch run");

    let run_all = || -> Vec<Result<BattleSummary, BatchError>> {
        (0..config.count)
            .into_par_iter()
            .map(|i| {
                let seed = config.seed_start.wrapping_add(u64::from(i));
                run_battle(scenario, seed).map_err(|e| {
                    warn!(seed, error = %e, "Battle failed");
                    BatchError {
                        seed,
                        message: e.to_string(),
                    }
                })
            })
            .collect()
    };

    let results = if config.parallel > 0 {
        match rayon::ThreadPoolBuilder::new().num_threads(config.parallel).build() {
            Ok(pool) => pool.install(run_all),
            Err(e) => {
                warn!(error = %e, "Could not build thread pool, using the global one");
                run_all()
            }
        }
    } else {
        run_all()
    };

    let (games, errors): (Vec<_>, Vec<_>) = results.into_iter().partition(Result::is_ok);
    let games: Vec<BattleSummary> = games.into_iter().filter_map(Result::ok).collect();
    let errors: Vec<BatchError> = errors.into_iter().filter_map(Result::err).collect();

    let summary = BatchSummary::from_games(&games);
    let duration_seconds = start.elapsed().as_secs_f64();

    info!(
        "Batch complete: {} battles in {:.1}s ({:.1} battles/sec)",
        games.len(),
        duration_seconds,
        games.len() as f64 / duration_seconds.max(0.001)
    );

    BatchResults {
        scenario: scenario.name.clone(),
        config,
        games,
        summary,
        duration_seconds,
        errors,
    }
}
