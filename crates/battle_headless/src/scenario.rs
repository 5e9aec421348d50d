//! Scenario loading and configuration.
//!
//! Scenarios define the starting state of a headless battle: the
//! battlefield configuration, optional unit catalog overrides, the units
//! placed before the start, and how long to let the battle run.

use std::path::Path;

use battle_core::components::Team;
use battle_core::config::BattleConfig;
use battle_core::data::UnitCatalog;
use battle_core::error::BattleError;
use battle_core::grid::Cell;
use battle_core::simulation::Battle;
use battle_core::unit_kind::UnitKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default tick limit: ten minutes at 60 ticks per second.
pub const DEFAULT_MAX_TICKS: u64 = 36_000;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// Configuration or catalog rejected by the core.
    #[error("Invalid scenario: {0}")]
    Invalid(#[from] BattleError),
    /// A placement was refused by the grid.
    #[error("Placement of '{kind}' at ({col}, {row}) rejected")]
    RejectedPlacement {
        /// Unit type name as written.
        kind: String,
        /// Column.
        col: u32,
        /// Row.
        row: u32,
    },
}

/// One unit placed before the battle starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Unit type name. Unknown names become the basic melee unit.
    pub kind: String,
    /// Owning team.
    pub team: Team,
    /// Grid column.
    pub col: u32,
    /// Grid row.
    pub row: u32,
}

impl Placement {
    /// Create a placement.
    pub fn new(kind: &str, team: Team, col: u32, row: u32) -> Self {
        Self {
            kind: kind.to_string(),
            team,
            col,
            row,
        }
    }
}

/// A complete scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Battlefield settings.
    #[serde(default)]
    pub config: BattleConfig,
    /// Catalog entries replacing the standard ones.
    #[serde(default = "UnitCatalog::empty")]
    pub overrides: UnitCatalog,
    /// Units placed before the start.
    #[serde(default)]
    pub placements: Vec<Placement>,
    /// Ticks after which an undecided battle is abandoned.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
    /// Cooldown time multiplier.
    #[serde(default = "default_time_scale")]
    pub time_scale: f32,
}

const fn default_max_ticks() -> u64 {
    DEFAULT_MAX_TICKS
}

const fn default_time_scale() -> f32 {
    1.0
}

impl Default for Scenario {
    fn default() -> Self {
        Self::skirmish()
    }
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string (useful for embedded scenarios).
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        scenario.config.validate()?;
        Ok(scenario)
    }

    /// A mixed-arms skirmish on the default battlefield.
    #[must_use]
    pub fn skirmish() -> Self {
        let mut placements = Vec::new();
        let lines = [
            ("Infantry", 6),
            ("HeavyInfantry", 7),
            ("Archer", 8),
            ("Catapult", 9),
        ];
        for (kind, col) in lines {
            placements.push(Placement::new(kind, Team::Enemy, col, 1));
            placements.push(Placement::new(kind, Team::Player, col, 8));
        }
        placements.push(Placement::new("Commander", Team::Enemy, 7, 0));
        placements.push(Placement::new("Medic", Team::Player, 7, 9));
        placements.push(Placement::new("Barracks", Team::Player, 2, 9));
        placements.push(Placement::new("Barracks", Team::Enemy, 12, 0));

        Self {
            name: "Skirmish".to_string(),
            description: "Mixed lines with support on both sides".to_string(),
            config: BattleConfig::default(),
            overrides: UnitCatalog::empty(),
            placements,
            max_ticks: DEFAULT_MAX_TICKS,
            time_scale: 1.0,
        }
    }

    /// Standard catalog with this scenario's overrides applied.
    pub fn catalog(&self) -> Result<UnitCatalog, ScenarioError> {
        let mut catalog = UnitCatalog::standard();
        for (kind, data) in self.overrides.iter() {
            catalog.insert(kind, data.clone());
        }
        catalog.validate()?;
        Ok(catalog)
    }

    /// Build the battle this scenario describes, still in setup.
    ///
    /// `seed` replaces the configured seed when given.
    pub fn build_battle(&self, seed: Option<u64>) -> Result<Battle, ScenarioError> {
        let mut config = self.config.clone();
        if let Some(seed) = seed {
            config.seed = seed;
        }
        let mut battle = Battle::new(config, self.catalog()?)?;
        battle.set_time_scale(self.time_scale);

        for placement in &self.placements {
            let kind = UnitKind::from_name(&placement.kind);
            let cell = Cell::new(placement.col, placement.row);
            if battle.place_in_cell(kind, placement.team, cell).is_none() {
                return Err(ScenarioError::RejectedPlacement {
                    kind: placement.kind.clone(),
                    col: placement.col,
                    row: placement.row,
                });
            }
        }
        tracing::debug!(scenario = %self.name, units = self.placements.len(), "Scenario loaded");
        Ok(battle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skirmish_builds() {
        let battle = Scenario::skirmish().build_battle(None).unwrap();
        assert_eq!(battle.roster().len(), 12);
        assert_eq!(battle.roster().living_count(Team::Player), 6);
    }

    #[test]
    fn test_minimal_ron() {
        let scenario = Scenario::from_ron_str(
            r#"(
                name: "Duel",
                placements: [
                    (kind: "Infantry", team: player, col: 7, row: 5),
                    (kind: "Dragon", team: enemy, col: 7, row: 4),
                ],
            )"#,
        )
        .unwrap();
        assert_eq!(scenario.max_ticks, DEFAULT_MAX_TICKS);
        let battle = scenario.build_battle(Some(9)).unwrap();
        assert_eq!(battle.config().seed, 9);
        assert_eq!(battle.roster().units()[1].kind, UnitKind::Basic);
    }

    #[test]
    fn test_overrides_apply() {
        let scenario = Scenario::from_ron_str(
            r#"(
                name: "Tough",
                overrides: {
                    Infantry: (health: 300.0, attack: 10.0, attack_cooldown: 0.5,
                               speed: 1.0, range: 25.0, behavior: Melee),
                },
                placements: [(kind: "Infantry", team: player, col: 0, row: 9)],
            )"#,
        )
        .unwrap();
        let battle = scenario.build_battle(None).unwrap();
        assert_eq!(battle.roster().units()[0].health.max, 300.0);
    }

    #[test]
    fn test_duplicate_cell_rejected() {
        let mut scenario = Scenario::skirmish();
        scenario.placements.push(Placement::new("Archer", Team::Player, 6, 8));
        assert!(matches!(
            scenario.build_battle(None),
            Err(ScenarioError::RejectedPlacement { col: 6, row: 8, .. })
        ));
    }

    #[test]
    fn test_bad_config_rejected() {
        assert!(matches!(
            Scenario::from_ron_str(r#"(name: "Flat", config: (height: 0.0))"#),
            Err(ScenarioError::Invalid(_))
        ));
    }
}
