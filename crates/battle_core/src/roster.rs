//! The battle roster.
//!
//! Arena of every unit and projectile in one battle session, addressed by
//! stable ids. Units are kept in insertion order, which is also id order,
//! so lookups use binary search and iteration order is the roster order
//! the simulation relies on.

use serde::{Deserialize, Serialize};

use crate::components::{ProjectileId, Team, UnitId};
use crate::data::UnitData;
use crate::error::{BattleError, Result};
use crate::math::Vec2;
use crate::projectile::{Launch, Projectile};
use crate::unit::Unit;
use crate::unit_kind::UnitKind;

/// All units and projectiles in one battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    units: Vec<Unit>,
    projectiles: Vec<Projectile>,
    next_unit_id: u32,
    next_projectile_id: u32,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self {
            units: Vec::new(),
            projectiles: Vec::new(),
            next_unit_id: 1,
            next_projectile_id: 1,
        }
    }

    /// Add a unit built from `data` and return its id.
    pub fn spawn_unit(&mut self, kind: UnitKind, team: Team, position: Vec2, data: &UnitData) -> UnitId {
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        self.units.push(Unit::from_data(id, kind, team, position, data));
        id
    }

    /// Add a projectile and return its id.
    pub fn launch(&mut self, launch: Launch) -> ProjectileId {
        let id = ProjectileId(self.next_projectile_id);
        self.next_projectile_id += 1;
        self.projectiles.push(Projectile::new(id, launch));
        id
    }

    fn index_of(&self, id: UnitId) -> Option<usize> {
        self.units.binary_search_by_key(&id, |u| u.id).ok()
    }

    /// Get a unit by id.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.index_of(id).map(|i| &self.units[i])
    }

    /// Get a mutable unit by id.
    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.index_of(id).map(move |i| &mut self.units[i])
    }

    /// Remove a unit, returning it.
    pub fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        self.index_of(id).map(|i| self.units.remove(i))
    }

    /// All units, living and dead, in roster order.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Mutable iteration over all units.
    pub fn units_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.units.iter_mut()
    }

    /// Living units in roster order.
    pub fn living(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.is_alive())
    }

    /// Snapshot of every unit id, in roster order.
    #[must_use]
    pub fn unit_ids(&self) -> Vec<UnitId> {
        self.units.iter().map(|u| u.id).collect()
    }

    /// Number of living units on `team`.
    #[must_use]
    pub fn living_count(&self, team: Team) -> usize {
        self.living().filter(|u| u.team == team).count()
    }

    /// Number of units, living and dead.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Check if the roster holds no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Projectiles in flight.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Mutable access to the projectile list.
    pub fn projectiles_mut(&mut self) -> &mut Vec<Projectile> {
        &mut self.projectiles
    }

    /// Release every buff `source` is holding. Returns the allies released.
    pub fn release_buffs_from(&mut self, source: UnitId) -> Vec<UnitId> {
        self.units
            .iter_mut()
            .filter_map(|u| u.release_buff(source).then_some(u.id))
            .collect()
    }

    /// Drop every unit and projectile. Ids keep counting up.
    pub fn clear(&mut self) {
        self.units.clear();
        self.projectiles.clear();
    }

    /// Check roster invariants, returning a description of the first
    /// violation.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidState`] naming the offending unit.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(BattleError::InvalidState(message));
        for pair in self.units.windows(2) {
            if pair[0].id >= pair[1].id {
                return invalid(format!("units out of id order at {}", pair[1].id));
            }
        }
        for unit in &self.units {
            let health = &unit.health;
            if health.current < 0.0 || health.current > health.max {
                return invalid(format!("{} health {} outside [0, {}]", unit.id, health.current, health.max));
            }
            if unit.is_dead() && (health.current != 0.0 || unit.is_buffed()) {
                return invalid(format!("{} is dead but not inert", unit.id));
            }
            if !unit.position.is_finite() {
                return invalid(format!("{} has a non-finite position", unit.id));
            }
            for source in &unit.buff_sources {
                if !self.get(*source).is_some_and(Unit::is_alive) {
                    return invalid(format!("{} is held by missing or dead buffer {source}", unit.id));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::UnitCatalog;
    use crate::projectile::ProjectileData;

    #[test]
    fn test_ids_are_sequential_and_stable() {
        let catalog = UnitCatalog::standard();
        let data = catalog.get(UnitKind::Infantry);
        let mut roster = Roster::new();
        let a = roster.spawn_unit(UnitKind::Infantry, Team::Player, Vec2::new(10.0, 10.0), data);
        let b = roster.spawn_unit(UnitKind::Infantry, Team::Enemy, Vec2::new(50.0, 10.0), data);
        let c = roster.spawn_unit(UnitKind::Infantry, Team::Enemy, Vec2::new(90.0, 10.0), data);
        assert_eq!((a, b, c), (UnitId(1), UnitId(2), UnitId(3)));

        roster.remove_unit(b);
        assert!(roster.get(b).is_none());
        assert_eq!(roster.get(c).map(|u| u.position.x), Some(90.0));
        assert_eq!(roster.unit_ids(), vec![a, c]);
        assert_eq!(roster.living_count(Team::Enemy), 1);
    }

    #[test]
    fn test_clear_keeps_ids_unique() {
        let catalog = UnitCatalog::standard();
        let mut roster = Roster::new();
        roster.spawn_unit(UnitKind::Archer, Team::Player, Vec2::ZERO, catalog.get(UnitKind::Archer));
        roster.launch(Launch {
            source: UnitId(1),
            team: Team::Player,
            origin: Vec2::ZERO,
            aim: Vec2::new(1.0, 0.0),
            damage: 10.0,
            data: ProjectileData::single(2.0, 5.0),
        });
        roster.clear();
        assert!(roster.is_empty());
        assert!(roster.projectiles().is_empty());
        let id = roster.spawn_unit(UnitKind::Archer, Team::Player, Vec2::ZERO, catalog.get(UnitKind::Archer));
        assert_eq!(id, UnitId(2));
    }

    #[test]
    fn test_release_buffs_from() {
        let catalog = UnitCatalog::standard();
        let mut roster = Roster::new();
        let commander = roster.spawn_unit(
            UnitKind::Commander,
            Team::Player,
            Vec2::ZERO,
            catalog.get(UnitKind::Commander),
        );
        let ally = roster.spawn_unit(
            UnitKind::Infantry,
            Team::Player,
            Vec2::new(20.0, 0.0),
            catalog.get(UnitKind::Infantry),
        );
        if let Some(unit) = roster.get_mut(ally) {
            unit.add_buff(commander, 25.0, 50.0);
        }
        assert!(roster.validate().is_ok());
        assert_eq!(roster.release_buffs_from(commander), vec![ally]);
        assert!(!roster.get(ally).is_some_and(Unit::is_buffed));
    }

    #[test]
    fn test_validate_reports_dead_buffer_as_invalid_state() {
        let catalog = UnitCatalog::standard();
        let mut roster = Roster::new();
        let commander = roster.spawn_unit(
            UnitKind::Commander,
            Team::Player,
            Vec2::ZERO,
            catalog.get(UnitKind::Commander),
        );
        let ally = roster.spawn_unit(
            UnitKind::Infantry,
            Team::Player,
            Vec2::new(20.0, 0.0),
            catalog.get(UnitKind::Infantry),
        );
        roster.get_mut(ally).unwrap().add_buff(commander, 25.0, 50.0);
        // Killed without releasing its buff
        roster.get_mut(commander).unwrap().die();

        let err = roster.validate().unwrap_err();
        assert!(matches!(err, BattleError::InvalidState(_)));
        assert!(err.to_string().contains("dead buffer"));
    }
}
