//! Serializable views of a battle for renderers and tooling.

use serde::{Deserialize, Serialize};

use crate::components::{BehaviorState, ProjectileId, Team, UnitId};
use crate::math::Vec2;
use crate::projectile::Projectile;
use crate::simulation::{Battle, Outcome, Phase};
use crate::unit::Unit;
use crate::unit_kind::UnitKind;

/// One unit as seen from outside the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    /// Roster identifier.
    pub id: UnitId,
    /// Unit type.
    pub kind: UnitKind,
    /// Owning team.
    pub team: Team,
    /// Center position.
    pub position: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Whether the unit is a corpse.
    pub dead: bool,
    /// Whether any buffer currently holds the unit.
    pub buffed: bool,
    /// Current attack power.
    pub attack: f32,
    /// Current speed.
    pub speed: f32,
    /// Action range.
    pub range: f32,
    /// Damage reduction percent.
    pub damage_reduction: f32,
    /// Behavior state from the last tick.
    pub state: BehaviorState,
}

impl From<&Unit> for UnitSnapshot {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id,
            kind: unit.kind,
            team: unit.team,
            position: unit.position,
            radius: unit.radius,
            health: unit.health.current,
            max_health: unit.health.max,
            dead: unit.is_dead(),
            buffed: unit.is_buffed(),
            attack: unit.attack.current,
            speed: unit.speed.current,
            range: unit.range,
            damage_reduction: unit.damage_reduction,
            state: unit.state,
        }
    }
}

/// One projectile in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    /// Projectile identifier.
    pub id: ProjectileId,
    /// Center position.
    pub position: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Team that fired it.
    pub team: Team,
}

impl From<&Projectile> for ProjectileSnapshot {
    fn from(projectile: &Projectile) -> Self {
        Self {
            id: projectile.id,
            position: projectile.position,
            radius: projectile.radius,
            team: projectile.team,
        }
    }
}

/// Whole-battle view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    /// Ticks run so far.
    pub tick: u64,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Outcome, once finished.
    pub outcome: Option<Outcome>,
    /// Every unit, living and dead, in roster order.
    pub units: Vec<UnitSnapshot>,
    /// Projectiles in flight.
    pub projectiles: Vec<ProjectileSnapshot>,
}

impl BattleSnapshot {
    /// Capture the current state of `battle`.
    #[must_use]
    pub fn capture(battle: &Battle) -> Self {
        let roster = battle.roster();
        Self {
            tick: battle.current_tick(),
            phase: battle.phase(),
            outcome: battle.outcome(),
            units: roster.units().iter().map(UnitSnapshot::from).collect(),
            projectiles: roster.projectiles().iter().map(ProjectileSnapshot::from).collect(),
        }
    }

    /// Living units of `team`.
    pub fn living(&self, team: Team) -> impl Iterator<Item = &UnitSnapshot> {
        self.units.iter().filter(move |u| u.team == team && !u.dead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_reflects_roster() {
        let mut battle = Battle::default();
        let id = battle.place_unit(UnitKind::Archer, Team::Player, 30.0, 570.0).unwrap();
        battle.place_unit(UnitKind::Medic, Team::Enemy, 30.0, 30.0).unwrap();

        let snapshot = battle.snapshot();
        assert_eq!(snapshot.phase, Phase::Setup);
        assert_eq!(snapshot.units.len(), 2);
        let archer = &snapshot.units[0];
        assert_eq!(archer.id, id);
        assert_eq!((archer.health, archer.max_health), (80.0, 80.0));
        assert_eq!(archer.range, 125.0);
        assert!(!archer.dead && !archer.buffed);
        assert_eq!(snapshot.living(Team::Enemy).count(), 1);
    }
}
