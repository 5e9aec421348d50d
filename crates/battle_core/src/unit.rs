//! The battlefield unit.
//!
//! A [`Unit`] is built from a [`UnitData`] descriptor and a handful of
//! components. It owns its own damage, buff and death bookkeeping; the
//! per-tick decision logic lives in [`behavior`](crate::behavior).

use serde::{Deserialize, Serialize};

use crate::behavior::Behavior;
use crate::components::{BehaviorState, Cooldown, Health, Stat, Team, UnitId, Vitality};
use crate::data::UnitData;
use crate::math::Vec2;
use crate::projectile::ProjectileData;
use crate::unit_kind::UnitKind;

/// A unit on the battlefield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Roster identifier.
    pub id: UnitId,
    /// Unit type.
    pub kind: UnitKind,
    /// Owning team.
    pub team: Team,
    /// Decision archetype and its parameters.
    pub behavior: Behavior,
    /// Center position.
    pub position: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Health points.
    pub health: Health,
    /// Attack power (buffable).
    pub attack: Stat,
    /// Movement speed per tick (buffable).
    pub speed: Stat,
    /// Attack, buff, or heal range.
    pub range: f32,
    /// Attack or spawn cooldown.
    pub cooldown: Cooldown,
    /// Damage reduction percent.
    pub damage_reduction: f32,
    /// Projectile fired when engaging, if any.
    pub projectile: Option<ProjectileData>,
    /// State chosen on the last tick.
    pub state: BehaviorState,
    /// Alive or dead.
    pub vitality: Vitality,
    /// Buffers currently holding this unit.
    pub buff_sources: Vec<UnitId>,
}

impl Unit {
    /// Build a fresh unit from its descriptor.
    #[must_use]
    pub fn from_data(id: UnitId, kind: UnitKind, team: Team, position: Vec2, data: &UnitData) -> Self {
        Self {
            id,
            kind,
            team,
            behavior: data.behavior.clone(),
            position,
            radius: data.radius,
            health: Health::new(data.health),
            attack: Stat::new(data.attack),
            speed: Stat::new(data.speed),
            range: data.range,
            cooldown: Cooldown::new(data.attack_cooldown),
            damage_reduction: data.damage_reduction,
            projectile: data.projectile,
            state: BehaviorState::Idle,
            vitality: Vitality::Alive,
            buff_sources: Vec::new(),
        }
    }

    /// Check if the unit is alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.vitality == Vitality::Alive
    }

    /// Check if the unit is dead.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        !self.is_alive()
    }

    /// Check if any buffer currently holds this unit.
    #[must_use]
    pub fn is_buffed(&self) -> bool {
        !self.buff_sources.is_empty()
    }

    /// Check if this unit is a support archetype.
    #[must_use]
    pub fn is_support(&self) -> bool {
        self.behavior.is_support()
    }

    /// Damage actually taken from an incoming `amount`.
    ///
    /// A non-zero reduction acts as a multiplier: a reduction of 15 means
    /// 15 % of the incoming damage is taken.
    #[must_use]
    pub fn effective_damage(&self, amount: f32) -> f32 {
        if self.damage_reduction == 0.0 {
            amount
        } else {
            amount * (self.damage_reduction / 100.0)
        }
    }

    /// Take a hit. Returns the health actually lost.
    ///
    /// Reaching zero health kills the unit and drops any buff it holds.
    /// Dead units ignore further damage.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        if self.is_dead() {
            return 0.0;
        }
        let lost = self.health.apply_damage(self.effective_damage(amount));
        if self.health.is_depleted() {
            self.die();
        }
        lost
    }

    /// Mark dead: zero health, no buffs, inert.
    pub fn die(&mut self) {
        self.health.current = 0.0;
        self.vitality = Vitality::Dead { ticks: 0 };
        self.state = BehaviorState::Idle;
        self.buff_sources.clear();
        self.attack.reset();
        self.speed.reset();
    }

    /// Set attack to `round(base + base × percent / 100)`.
    pub fn apply_damage_buff(&mut self, percent: f32) {
        self.attack.apply_percent(percent);
    }

    /// Set speed to `round(base + base × percent / 100)`.
    pub fn apply_speed_buff(&mut self, percent: f32) {
        self.speed.apply_percent(percent);
    }

    /// Restore base attack.
    pub fn remove_damage_buff(&mut self) {
        self.attack.reset();
    }

    /// Restore base speed.
    pub fn remove_speed_buff(&mut self) {
        self.speed.reset();
    }

    /// Record `source` as holding this unit and apply its buff.
    pub fn add_buff(&mut self, source: UnitId, damage_percent: f32, speed_percent: f32) {
        if self.is_dead() {
            return;
        }
        if !self.buff_sources.contains(&source) {
            self.buff_sources.push(source);
        }
        self.apply_damage_buff(damage_percent);
        self.apply_speed_buff(speed_percent);
    }

    /// Drop `source`'s hold. Stats return to base once no source remains.
    ///
    /// Returns `true` if `source` was holding this unit.
    pub fn release_buff(&mut self, source: UnitId) -> bool {
        let before = self.buff_sources.len();
        self.buff_sources.retain(|s| *s != source);
        let released = self.buff_sources.len() != before;
        if self.buff_sources.is_empty() {
            self.remove_damage_buff();
            self.remove_speed_buff();
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::UnitCatalog;

    fn unit(kind: UnitKind) -> Unit {
        let catalog = UnitCatalog::standard();
        Unit::from_data(UnitId(1), kind, Team::Player, Vec2::new(50.0, 50.0), catalog.get(kind))
    }

    #[test]
    fn test_damage_reduction_is_a_multiplier() {
        let mut heavy = unit(UnitKind::HeavyInfantry);
        let lost = heavy.take_damage(10.0);
        assert!((lost - 1.5).abs() < 1e-6);
        assert!((heavy.health.current - 118.5).abs() < 1e-4);

        let mut infantry = unit(UnitKind::Infantry);
        assert_eq!(infantry.take_damage(10.0), 10.0);
    }

    #[test]
    fn test_lethal_damage_kills_and_clamps() {
        let mut infantry = unit(UnitKind::Infantry);
        infantry.add_buff(UnitId(9), 25.0, 50.0);
        infantry.take_damage(500.0);
        assert!(infantry.is_dead());
        assert_eq!(infantry.health.current, 0.0);
        assert!(!infantry.is_buffed());
        assert_eq!(infantry.attack.current, infantry.attack.base);

        // Corpses ignore further hits
        assert_eq!(infantry.take_damage(10.0), 0.0);
        assert_eq!(infantry.vitality, Vitality::Dead { ticks: 0 });
    }

    #[test]
    fn test_buff_released_by_last_source() {
        let mut infantry = unit(UnitKind::Infantry);
        infantry.add_buff(UnitId(7), 25.0, 50.0);
        infantry.add_buff(UnitId(8), 25.0, 50.0);
        assert_eq!(infantry.attack.current, 13.0);
        assert_eq!(infantry.speed.current, 2.0);

        assert!(infantry.release_buff(UnitId(7)));
        assert!(infantry.is_buffed());
        assert_eq!(infantry.attack.current, 13.0);

        assert!(infantry.release_buff(UnitId(8)));
        assert!(!infantry.is_buffed());
        assert_eq!(infantry.attack.current, 10.0);
        assert_eq!(infantry.speed.current, 1.0);

        assert!(!infantry.release_buff(UnitId(8)));
    }

    #[test]
    fn test_dead_units_cannot_be_buffed() {
        let mut infantry = unit(UnitKind::Infantry);
        infantry.die();
        infantry.add_buff(UnitId(3), 25.0, 50.0);
        assert!(!infantry.is_buffed());
        assert_eq!(infantry.attack.current, 10.0);
    }
}
