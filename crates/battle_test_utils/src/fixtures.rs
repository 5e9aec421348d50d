//! Test fixtures and helpers.
//!
//! Pre-built battles and roster setups for consistent testing.

use battle_core::components::{Team, UnitId};
use battle_core::config::BattleConfig;
use battle_core::data::UnitCatalog;
use battle_core::grid::Cell;
use battle_core::math::Vec2;
use battle_core::roster::Roster;
use battle_core::simulation::Battle;
use battle_core::unit_kind::UnitKind;

/// A 300×200 field with the default 15×10 grid, so cells are 20 px
/// squares and units in vertically adjacent cells start in melee range.
#[must_use]
pub fn small_config() -> BattleConfig {
    BattleConfig {
        width: 300.0,
        height: 200.0,
        ..BattleConfig::default()
    }
}

/// A battle in setup on [`small_config`] with the standard catalog.
///
/// # Panics
///
/// Panics if the standard configuration is rejected.
#[must_use]
pub fn small_battle() -> Battle {
    Battle::new(small_config(), UnitCatalog::standard()).expect("standard config is valid")
}

/// Place a unit in a cell, panicking if the placement is rejected.
///
/// # Panics
///
/// Panics if the cell is taken, off the grid, or the battle has started.
pub fn place(battle: &mut Battle, kind: UnitKind, team: Team, col: u32, row: u32) -> UnitId {
    battle
        .place_in_cell(kind, team, Cell::new(col, row))
        .unwrap_or_else(|| panic!("placement of {kind} at ({col}, {row}) rejected"))
}

/// Two units of `kind` facing each other across the territory line of a
/// [`small_battle`], already started. Returns `(battle, player, enemy)`.
///
/// With the standard radius the pair touch, so melee kinds engage on the
/// first tick.
#[must_use]
pub fn duel(kind: UnitKind) -> (Battle, UnitId, UnitId) {
    let mut battle = small_battle();
    let player = place(&mut battle, kind, Team::Player, 7, 5);
    let enemy = place(&mut battle, kind, Team::Enemy, 7, 4);
    battle.start();
    (battle, player, enemy)
}

/// Spawn a unit straight into a roster using the standard catalog.
pub fn spawn(roster: &mut Roster, kind: UnitKind, team: Team, x: f32, y: f32) -> UnitId {
    let catalog = UnitCatalog::standard();
    roster.spawn_unit(kind, team, Vec2::new(x, y), catalog.get(kind))
}

/// A started default-size battle where each side gets one unit per entry
/// in `kinds`, laid out row by row from its back edge.
///
/// # Panics
///
/// Panics if the armies do not fit in half the grid.
#[must_use]
pub fn crowded_battle(kinds: &[UnitKind], seed: u64) -> Battle {
    let config = BattleConfig {
        seed,
        ..BattleConfig::default()
    };
    let mut battle = Battle::new(config, UnitCatalog::standard()).expect("default config is valid");
    let cols = battle.grid().cols();
    let rows = battle.grid().rows();

    for (slot, kind) in kinds.iter().enumerate() {
        let slot = slot as u32;
        let (col, depth) = (slot % cols, slot / cols);
        place(&mut battle, *kind, Team::Enemy, col, depth);
        place(&mut battle, *kind, Team::Player, col, rows - 1 - depth);
    }
    battle.start();
    battle
}
