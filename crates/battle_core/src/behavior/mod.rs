//! Per-tick unit decision logic.
//!
//! Every archetype answers the same question each tick: given the current
//! roster, what does this unit do? The answer is a [`Plan`]. Deciding never
//! mutates anything; the [`Battle`](crate::simulation::Battle) applies each
//! plan before the next unit decides, so later units see earlier moves.
//!
//! # Archetypes
//!
//! - [`melee`]: close in and strike directly.
//! - [`ranged`]: close to range and fire projectiles.
//! - [`buffer`]: follow allies and raise their attack and speed.
//! - [`healer`]: stay behind allies and mend the most wounded.
//! - [`producer`]: stand still and trade health for new units.
//!
//! Buffers and healers share the regroup/self-defense rules in
//! [`support`].

pub mod buffer;
pub mod healer;
pub mod melee;
pub mod producer;
pub mod ranged;
pub mod support;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{BehaviorState, UnitId};
use crate::data::UnitCatalog;
use crate::math::{Bounds, Vec2};
use crate::movement::step_toward;
use crate::projectile::Launch;
use crate::roster::Roster;
use crate::unit::Unit;
use crate::unit_kind::UnitKind;

/// Buffer archetype parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferParams {
    /// Attack increase, in percent of base.
    pub damage_percent: f32,
    /// Speed increase, in percent of base.
    pub speed_percent: f32,
}

impl Default for BufferParams {
    fn default() -> Self {
        Self {
            damage_percent: 25.0,
            speed_percent: 50.0,
        }
    }
}

/// Healer archetype parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealerParams {
    /// Most allies healed per tick.
    pub max_targets: usize,
    /// Frames over which one attack's worth of health is restored.
    pub heal_frames: f32,
    /// Distance kept behind the ally group, away from the enemy.
    pub standoff: f32,
}

impl Default for HealerParams {
    fn default() -> Self {
        Self {
            max_targets: 3,
            heal_frames: 60.0,
            standoff: 30.0,
        }
    }
}

/// Producer archetype parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducerParams {
    /// Health above which the producer keeps spawning.
    pub health_threshold: f32,
    /// Health paid per spawned unit.
    pub health_cost: f32,
    /// Health regenerated per frame while recovering.
    pub regen_per_frame: f32,
    /// Kinds to choose from, uniformly at random.
    pub pool: Vec<UnitKind>,
    /// Gap left between the producer and a fresh unit.
    #[serde(default = "default_spawn_gap")]
    pub spawn_gap: f32,
}

const fn default_spawn_gap() -> f32 {
    2.0
}

impl Default for ProducerParams {
    fn default() -> Self {
        Self {
            health_threshold: 60.0,
            health_cost: 20.0,
            regen_per_frame: 0.05,
            pool: vec![UnitKind::Infantry, UnitKind::Archer, UnitKind::HeavyInfantry],
            spawn_gap: default_spawn_gap(),
        }
    }
}

/// Decision archetype of a unit type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    /// Direct-damage fighter.
    Melee,
    /// Projectile fighter.
    Ranged,
    /// Support unit raising allies' attack and speed.
    Buffer(BufferParams),
    /// Support unit restoring allies' health.
    Healer(HealerParams),
    /// Stationary support unit spawning new units.
    Producer(ProducerParams),
}

impl Behavior {
    /// Check if this is a support archetype.
    #[must_use]
    pub const fn is_support(&self) -> bool {
        matches!(self, Self::Buffer(_) | Self::Healer(_) | Self::Producer(_))
    }

    /// Short archetype name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Melee => "melee",
            Self::Ranged => "ranged",
            Self::Buffer(_) => "buffer",
            Self::Healer(_) => "healer",
            Self::Producer(_) => "producer",
        }
    }
}

/// What happens to a unit's cooldown this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CooldownAction {
    /// Leave it alone.
    #[default]
    Hold,
    /// Decay by one frame times the elapsed factor.
    Tick,
    /// Wind it back up to its full period.
    Reset,
}

/// A side effect of a unit's decision, applied by the battle.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Direct damage to a unit.
    Strike {
        /// Unit struck.
        target: UnitId,
        /// Damage before reduction.
        damage: f32,
    },
    /// Fire a projectile.
    Launch(Launch),
    /// Put (or keep) an ally under this unit's buff.
    Buff {
        /// Ally buffed.
        ally: UnitId,
        /// Attack increase in percent.
        damage_percent: f32,
        /// Speed increase in percent.
        speed_percent: f32,
    },
    /// Release an ally from this unit's buff.
    Unbuff {
        /// Ally released.
        ally: UnitId,
    },
    /// Restore an ally's health.
    Heal {
        /// Ally healed.
        ally: UnitId,
        /// Health restored.
        amount: f32,
    },
    /// Create a new unit on the acting unit's team.
    Spawn {
        /// Kind spawned.
        kind: UnitKind,
        /// Where it appears.
        position: Vec2,
        /// Health the acting unit pays.
        health_cost: f32,
    },
    /// Restore the acting unit's own health, up to `cap`.
    Regenerate {
        /// Health restored.
        amount: f32,
        /// Health ceiling.
        cap: f32,
    },
}

/// Output of one unit's decision step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Plan {
    /// State to record on the unit.
    pub state: BehaviorState,
    /// New position, if the unit moves.
    pub destination: Option<Vec2>,
    /// Cooldown handling.
    pub cooldown: CooldownAction,
    /// Effects on other units, projectiles, or itself.
    pub effects: Vec<Effect>,
}

impl Plan {
    /// Plan that does nothing.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Empty plan in the given state.
    #[must_use]
    pub fn in_state(state: BehaviorState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// Act if the cooldown allows, otherwise let it decay.
    pub fn act_or_wait(&mut self, unit: &Unit, effect: impl FnOnce() -> Effect) {
        if unit.cooldown.is_ready() {
            self.effects.push(effect());
            self.cooldown = CooldownAction::Reset;
        } else {
            self.cooldown = CooldownAction::Tick;
        }
    }
}

/// Read-only view of the battle handed to each decision.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Every unit and projectile.
    pub roster: &'a Roster,
    /// Battlefield extent.
    pub bounds: Bounds,
    /// Unit descriptors, for spawn sizing.
    pub catalog: &'a UnitCatalog,
}

impl Context<'_> {
    /// One movement step for `unit` toward `target`.
    #[must_use]
    pub fn step(&self, unit: &Unit, target: Vec2) -> Option<Vec2> {
        step_toward(self.roster, unit, target, self.bounds)
    }
}

/// Decide what `unit` does this tick.
///
/// Dead units always get an idle plan.
pub fn decide<R: Rng + ?Sized>(unit: &Unit, ctx: &Context<'_>, rng: &mut R) -> Plan {
    if unit.is_dead() {
        return Plan::idle();
    }
    match &unit.behavior {
        Behavior::Melee => melee::decide(unit, ctx),
        Behavior::Ranged => ranged::decide(unit, ctx),
        Behavior::Buffer(params) => buffer::decide(unit, params, ctx),
        Behavior::Healer(params) => healer::decide(unit, params, ctx),
        Behavior::Producer(params) => producer::decide(unit, params, ctx, rng),
    }
}

/// Build a launch order from `unit` toward `target`, if it carries a
/// projectile.
#[must_use]
pub fn launch_at(unit: &Unit, target: &Unit) -> Option<Launch> {
    unit.projectile.map(|data| Launch {
        source: unit.id,
        team: unit.team,
        origin: unit.position,
        aim: target.position - unit.position,
        damage: unit.attack.current,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_archetypes() {
        assert!(!Behavior::Melee.is_support());
        assert!(!Behavior::Ranged.is_support());
        assert!(Behavior::Buffer(BufferParams::default()).is_support());
        assert!(Behavior::Healer(HealerParams::default()).is_support());
        assert!(Behavior::Producer(ProducerParams::default()).is_support());
    }

    #[test]
    fn test_behavior_ron_shape() {
        let behavior: Behavior = ron::from_str(
            "Producer((health_threshold: 50.0, health_cost: 10.0, regen_per_frame: 0.1, pool: [Archer]))",
        )
        .unwrap();
        let Behavior::Producer(params) = behavior else {
            panic!("expected producer");
        };
        assert_eq!(params.pool, vec![UnitKind::Archer]);
        assert_eq!(params.spawn_gap, 2.0);
    }
}
