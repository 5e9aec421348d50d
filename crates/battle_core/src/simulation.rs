//! Battle tick orchestrator.
//!
//! [`Battle`] owns everything for one session: the configuration, the unit
//! catalog, the placement grid, the roster, and the spawn RNG. Before the
//! battle starts it accepts placements; once running, every call to
//! [`Battle::tick`] advances one frame.
//!
//! # Tick order
//!
//! 1. **Units**: each unit alive at the start of the tick, in roster
//!    order, decides a [`Plan`] and has it applied before the next unit
//!    decides. Units spawned during the tick act from the next one.
//! 2. **Projectiles**: move or hit ([`projectile_system`]).
//! 3. **Corpses**: age and clear ([`corpse_system`]).
//! 4. **Outcome**: stop once a team is eliminated ([`outcome_system`]).
//!
//! # Example
//!
//! ```
//! use battle_core::prelude::*;
//!
//! let mut battle = Battle::default();
//! battle.place_unit(UnitKind::Infantry, Team::Player, 450.0, 450.0);
//! battle.place_unit(UnitKind::Infantry, Team::Enemy, 450.0, 150.0);
//! assert!(battle.start());
//!
//! let events = battle.tick();
//! assert_eq!(events.tick, 1);
//! assert_eq!(battle.phase(), Phase::Running);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::behavior::{self, Context, CooldownAction, Effect, Plan};
use crate::combat::{self, DamageEvent, DamageKind, HealEvent};
use crate::components::{ProjectileId, Team, UnitId};
use crate::config::BattleConfig;
use crate::data::UnitCatalog;
use crate::error::Result;
use crate::grid::{Cell, Grid};
use crate::math::Vec2;
use crate::roster::Roster;
use crate::snapshot::BattleSnapshot;
use crate::systems::{corpse_system, outcome_system, projectile_system};
use crate::unit_kind::UnitKind;

/// How a finished battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Only this team has living units.
    Victory(Team),
    /// Nobody is left standing.
    Draw,
}

impl Outcome {
    /// Winning team, if any.
    #[must_use]
    pub const fn winner(self) -> Option<Team> {
        match self {
            Self::Victory(team) => Some(team),
            Self::Draw => None,
        }
    }
}

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Accepting placements.
    #[default]
    Setup,
    /// Ticking.
    Running,
    /// Started but frozen.
    Paused,
    /// One side was eliminated.
    Finished(Outcome),
}

/// Events generated during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickEvents {
    /// Tick number after this tick (0 if nothing ran).
    pub tick: u64,
    /// Damage from strikes, impacts, and splashes.
    pub damage: Vec<DamageEvent>,
    /// Healing applied.
    pub heals: Vec<HealEvent>,
    /// Units that died.
    pub deaths: Vec<UnitId>,
    /// Units created by producers.
    pub spawned: Vec<UnitId>,
    /// Projectiles fired.
    pub launched: Vec<ProjectileId>,
    /// Corpses cleared from the roster.
    pub removed: Vec<UnitId>,
    /// Set on the tick the battle ends.
    pub outcome: Option<Outcome>,
}

impl TickEvents {
    fn record_damage(&mut self, event: Option<DamageEvent>) {
        if let Some(event) = event {
            if event.lethal {
                self.deaths.push(event.target);
            }
            self.damage.push(event);
        }
    }
}

/// One battle session.
#[derive(Debug, Clone)]
pub struct Battle {
    config: BattleConfig,
    catalog: UnitCatalog,
    grid: Grid,
    roster: Roster,
    phase: Phase,
    selected: Option<UnitKind>,
    time_scale: f32,
    tick: u64,
    rng: Pcg64,
}

impl Default for Battle {
    fn default() -> Self {
        Self::build(BattleConfig::default(), UnitCatalog::standard())
    }
}

impl Battle {
    /// Create a battle from a configuration and catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if either fails validation.
    pub fn new(config: BattleConfig, catalog: UnitCatalog) -> Result<Self> {
        config.validate()?;
        catalog.validate()?;
        Ok(Self::build(config, catalog))
    }

    fn build(config: BattleConfig, catalog: UnitCatalog) -> Self {
        let grid = Grid::new(config.columns, config.rows, config.bounds());
        let rng = Pcg64::seed_from_u64(config.seed);
        Self {
            config,
            catalog,
            grid,
            roster: Roster::new(),
            phase: Phase::Setup,
            selected: None,
            time_scale: 1.0,
            tick: 0,
            rng,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Outcome, once finished.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Ticks run so far.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Cooldown time multiplier.
    #[must_use]
    pub const fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Kind chosen for [`place_selected`](Self::place_selected).
    #[must_use]
    pub const fn selected(&self) -> Option<UnitKind> {
        self.selected
    }

    /// Every unit and projectile.
    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Direct roster access for tools and tests. Bypasses placement rules.
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    /// Placement grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Unit descriptors.
    #[must_use]
    pub const fn catalog(&self) -> &UnitCatalog {
        &self.catalog
    }

    // ------------------------------------------------------------------
    // Setup
    // ------------------------------------------------------------------

    /// Choose the kind placed by [`place_selected`](Self::place_selected).
    ///
    /// Returns `false` and keeps the previous selection if `kind` is locked.
    pub fn select_unit_type(&mut self, kind: UnitKind) -> bool {
        if !self.config.is_unlocked(kind) {
            debug!(%kind, "Rejected selection of locked unit type");
            return false;
        }
        self.selected = Some(kind);
        true
    }

    /// Place a unit of `kind` for `team` in the cell under `(x, y)`.
    ///
    /// The unit snaps to the cell center. Returns `None` if the battle has
    /// started, the point is off the field, or the cell is taken.
    pub fn place_unit(&mut self, kind: UnitKind, team: Team, x: f32, y: f32) -> Option<UnitId> {
        let Some(cell) = self.grid.cell_at(Vec2::new(x, y)) else {
            debug!(x, y, "Rejected placement outside the battlefield");
            return None;
        };
        self.place_in_cell(kind, team, cell)
    }

    /// Place a unit of `kind` for `team` in `cell`.
    pub fn place_in_cell(&mut self, kind: UnitKind, team: Team, cell: Cell) -> Option<UnitId> {
        if self.phase != Phase::Setup {
            debug!(?cell, "Rejected placement after battle start");
            return None;
        }
        if !self.grid.contains(cell) || self.grid.is_occupied(cell) {
            debug!(?cell, "Rejected placement in unavailable cell");
            return None;
        }
        let position = self.grid.center(cell);
        let id = self.roster.spawn_unit(kind, team, position, self.catalog.get(kind));
        self.grid.occupy(cell, id);
        debug!(unit = %id, %kind, team = team.as_str(), ?cell, "Placed unit");
        Some(id)
    }

    /// Place the selected kind under `(x, y)` for whichever team owns that
    /// territory.
    pub fn place_selected(&mut self, x: f32, y: f32) -> Option<UnitId> {
        let Some(kind) = self.selected.filter(|k| self.config.is_unlocked(*k)) else {
            debug!("No unit type selected");
            return None;
        };
        let cell = self.grid.cell_at(Vec2::new(x, y))?;
        let team = self.grid.territory(cell);
        self.place_in_cell(kind, team, cell)
    }

    /// Remove the unit placed at `(col, row)`. Only allowed before start.
    pub fn remove_unit_at(&mut self, col: u32, row: u32) -> Option<UnitId> {
        if self.phase != Phase::Setup {
            debug!(col, row, "Rejected removal after battle start");
            return None;
        }
        let id = self.grid.vacate(Cell::new(col, row))?;
        self.roster.remove_unit(id);
        debug!(unit = %id, col, row, "Removed unit");
        Some(id)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Start the battle. Returns `false` unless in setup.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Setup {
            return false;
        }
        self.phase = Phase::Running;
        info!(
            player = self.roster.living_count(Team::Player),
            enemy = self.roster.living_count(Team::Enemy),
            "Battle started"
        );
        true
    }

    /// Freeze a running battle.
    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.phase = Phase::Paused;
        true
    }

    /// Unfreeze a paused battle.
    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        self.phase = Phase::Running;
        true
    }

    /// Clear every unit and projectile and return to setup.
    ///
    /// The selection and time scale are kept; the RNG is reseeded.
    pub fn reset(&mut self) {
        self.roster.clear();
        self.grid.clear();
        self.phase = Phase::Setup;
        self.tick = 0;
        self.rng = Pcg64::seed_from_u64(self.config.seed);
        info!("Battle reset");
    }

    /// Set the cooldown time multiplier.
    ///
    /// Non-positive or non-finite values fall back to 1. Returns the value
    /// applied.
    pub fn set_time_scale(&mut self, scale: f32) -> f32 {
        self.time_scale = if scale > 0.0 && scale.is_finite() { scale } else { 1.0 };
        self.time_scale
    }

    /// Check whether ticks currently advance the battle.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    // ------------------------------------------------------------------
    // Ticking
    // ------------------------------------------------------------------

    /// Advance one frame. Does nothing unless running.
    pub fn tick(&mut self) -> TickEvents {
        let mut events = TickEvents::default();
        if !self.is_running() {
            return events;
        }

        // Snapshot: units spawned this tick wait for the next one
        for id in self.roster.unit_ids() {
            let plan = {
                let Some(unit) = self.roster.get(id) else {
                    continue;
                };
                if unit.is_dead() {
                    continue;
                }
                let ctx = Context {
                    roster: &self.roster,
                    bounds: self.config.bounds(),
                    catalog: &self.catalog,
                };
                behavior::decide(unit, &ctx, &mut self.rng)
            };
            self.apply_plan(id, plan, &mut events);
        }

        let report = projectile_system(&mut self.roster, self.config.bounds(), self.config.projectile_lifetime_ticks);
        for event in report.damage {
            events.record_damage(Some(event));
        }

        events.removed = corpse_system(&mut self.roster, self.config.corpse_ticks);

        self.tick += 1;
        events.tick = self.tick;

        if let Some(outcome) = outcome_system(&self.roster) {
            self.phase = Phase::Finished(outcome);
            events.outcome = Some(outcome);
            info!(tick = self.tick, ?outcome, "Battle finished");
        }

        #[cfg(feature = "debug-validation")]
        {
            let check = self.roster.validate();
            if let Err(violation) = &check {
                tracing::error!(tick = self.tick, %violation, "Roster invariant violated");
            }
            debug_assert!(check.is_ok(), "roster invariant violated");
        }

        trace!(
            tick = self.tick,
            damage = events.damage.len(),
            deaths = events.deaths.len(),
            projectiles = self.roster.projectiles().len(),
            "Tick complete"
        );
        events
    }

    /// Tick until the battle finishes or `max_ticks` have run.
    ///
    /// Returns the outcome if the battle finished.
    pub fn run_until_finished(&mut self, max_ticks: u64) -> Option<Outcome> {
        for _ in 0..max_ticks {
            if !self.is_running() {
                break;
            }
            self.tick();
        }
        self.outcome()
    }

    fn apply_plan(&mut self, id: UnitId, plan: Plan, events: &mut TickEvents) {
        let Some(unit) = self.roster.get_mut(id) else {
            return;
        };
        unit.state = plan.state;
        if let Some(destination) = plan.destination {
            unit.position = destination;
        }
        match plan.cooldown {
            CooldownAction::Hold => {}
            CooldownAction::Tick => unit.cooldown.tick(self.time_scale),
            CooldownAction::Reset => unit.cooldown.reset(),
        }
        let team = unit.team;

        for effect in plan.effects {
            match effect {
                Effect::Strike { target, damage } => {
                    let event = combat::deal_damage(&mut self.roster, id, target, damage, DamageKind::Direct);
                    events.record_damage(event);
                }
                Effect::Launch(launch) => {
                    let projectile = self.roster.launch(launch);
                    trace!(unit = %id, ?projectile, "Projectile launched");
                    events.launched.push(projectile);
                }
                Effect::Buff {
                    ally,
                    damage_percent,
                    speed_percent,
                } => {
                    if let Some(ally) = self.roster.get_mut(ally) {
                        ally.add_buff(id, damage_percent, speed_percent);
                    }
                }
                Effect::Unbuff { ally } => {
                    if let Some(ally) = self.roster.get_mut(ally) {
                        ally.release_buff(id);
                    }
                }
                Effect::Heal { ally, amount } => {
                    events.heals.extend(combat::heal(&mut self.roster, id, ally, amount));
                }
                Effect::Spawn {
                    kind,
                    position,
                    health_cost,
                } => {
                    let spawned = self.roster.spawn_unit(kind, team, position, self.catalog.get(kind));
                    debug!(producer = %id, unit = %spawned, %kind, "Unit spawned");
                    events.spawned.push(spawned);
                    if combat::pay_health(&mut self.roster, id, health_cost) {
                        events.deaths.push(id);
                    }
                }
                Effect::Regenerate { amount, cap } => {
                    if let Some(unit) = self.roster.get_mut(id) {
                        unit.health.heal_up_to(amount, cap);
                    }
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Serializable view of the whole battle.
    #[must_use]
    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot::capture(self)
    }

    /// Hash of the battle state, for reproducibility checks.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.tick.hash(&mut hasher);
        self.phase.hash(&mut hasher);
        for unit in self.roster.units() {
            unit.id.hash(&mut hasher);
            unit.position.x.to_bits().hash(&mut hasher);
            unit.position.y.to_bits().hash(&mut hasher);
            unit.health.current.to_bits().hash(&mut hasher);
            unit.vitality.hash(&mut hasher);
        }
        for projectile in self.roster.projectiles() {
            projectile.id.hash(&mut hasher);
            projectile.position.x.to_bits().hash(&mut hasher);
            projectile.position.y.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::BehaviorState;

    fn small_battle() -> Battle {
        let config = BattleConfig {
            width: 300.0,
            height: 200.0,
            ..BattleConfig::default()
        };
        Battle::new(config, UnitCatalog::standard()).unwrap()
    }

    #[test]
    fn test_placement_snaps_and_blocks_cell() {
        let mut battle = Battle::default();
        let id = battle.place_unit(UnitKind::Infantry, Team::Player, 431.0, 455.0).unwrap();
        assert_eq!(battle.roster().get(id).unwrap().position, Vec2::new(450.0, 450.0));
        assert!(battle.place_unit(UnitKind::Archer, Team::Player, 449.0, 479.0).is_none());
        assert!(battle.place_unit(UnitKind::Archer, Team::Player, 1000.0, 10.0).is_none());
    }

    #[test]
    fn test_place_selected_uses_territory() {
        let mut battle = Battle::default();
        assert!(battle.place_selected(30.0, 30.0).is_none());
        assert!(!battle.select_unit_type(UnitKind::Basic));
        assert!(battle.select_unit_type(UnitKind::Archer));

        let enemy = battle.place_selected(30.0, 30.0).unwrap();
        let player = battle.place_selected(30.0, 570.0).unwrap();
        assert_eq!(battle.roster().get(enemy).unwrap().team, Team::Enemy);
        assert_eq!(battle.roster().get(player).unwrap().team, Team::Player);
    }

    #[test]
    fn test_setup_locked_after_start() {
        let mut battle = Battle::default();
        battle.place_unit(UnitKind::Infantry, Team::Player, 30.0, 570.0);
        battle.place_unit(UnitKind::Infantry, Team::Enemy, 30.0, 30.0);
        assert!(battle.start());
        assert!(!battle.start());
        assert!(battle.place_unit(UnitKind::Infantry, Team::Player, 90.0, 570.0).is_none());
        assert!(battle.remove_unit_at(0, 9).is_none());
        assert_eq!(battle.roster().len(), 2);
    }

    #[test]
    fn test_remove_before_start() {
        let mut battle = Battle::default();
        let id = battle.place_unit(UnitKind::Infantry, Team::Player, 30.0, 570.0).unwrap();
        assert_eq!(battle.remove_unit_at(0, 9), Some(id));
        assert!(battle.roster().is_empty());
        assert!(battle.remove_unit_at(0, 9).is_none());
        assert!(battle.place_unit(UnitKind::Archer, Team::Player, 30.0, 570.0).is_some());
    }

    #[test]
    fn test_pause_freezes_ticks() {
        let mut battle = Battle::default();
        battle.place_unit(UnitKind::Infantry, Team::Player, 30.0, 570.0);
        battle.place_unit(UnitKind::Infantry, Team::Enemy, 30.0, 30.0);
        assert_eq!(battle.tick().tick, 0);
        battle.start();
        battle.tick();
        assert!(battle.pause());
        let hash = battle.state_hash();
        assert_eq!(battle.tick(), TickEvents::default());
        assert_eq!(battle.state_hash(), hash);
        assert!(battle.resume());
        assert_eq!(battle.tick().tick, 2);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut battle = Battle::default();
        battle.select_unit_type(UnitKind::Infantry);
        battle.set_time_scale(2.0);
        battle.place_unit(UnitKind::Infantry, Team::Player, 30.0, 570.0);
        battle.place_unit(UnitKind::Infantry, Team::Enemy, 30.0, 30.0);
        battle.start();
        battle.tick();
        battle.reset();
        assert_eq!(battle.phase(), Phase::Setup);
        assert_eq!(battle.current_tick(), 0);
        assert!(battle.roster().is_empty());
        assert_eq!(battle.grid().occupied().count(), 0);
        assert_eq!(battle.selected(), Some(UnitKind::Infantry));
        assert_eq!(battle.time_scale(), 2.0);
    }

    #[test]
    fn test_time_scale_falls_back() {
        let mut battle = Battle::default();
        assert_eq!(battle.set_time_scale(0.0), 1.0);
        assert_eq!(battle.set_time_scale(f32::NAN), 1.0);
        assert_eq!(battle.set_time_scale(3.0), 3.0);
    }

    #[test]
    fn test_one_sided_battle_finishes_immediately() {
        let mut battle = Battle::default();
        battle.place_unit(UnitKind::Infantry, Team::Player, 30.0, 570.0);
        battle.start();
        let events = battle.tick();
        assert_eq!(events.outcome, Some(Outcome::Victory(Team::Player)));
        assert_eq!(battle.outcome().and_then(Outcome::winner), Some(Team::Player));
        assert_eq!(battle.tick().tick, 0);
    }

    #[test]
    fn test_adjacent_rows_engage_at_once() {
        // 20 px cells: rows 4 and 5 are 20 px apart, inside melee range
        let mut battle = small_battle();
        let player = battle.place_in_cell(UnitKind::Infantry, Team::Player, Cell::new(7, 5)).unwrap();
        battle.place_in_cell(UnitKind::Infantry, Team::Enemy, Cell::new(7, 4)).unwrap();
        battle.start();
        battle.tick();
        let unit = battle.roster().get(player).unwrap();
        assert_eq!(unit.state, BehaviorState::Engaging);
        assert_eq!(unit.position, Vec2::new(150.0, 110.0));
    }
}
