//! Unit data structures for data-driven unit definitions.

use serde::{Deserialize, Serialize};

use crate::behavior::{Behavior, HealerParams, ProducerParams};
use crate::error::{BattleError, Result};
use crate::projectile::ProjectileData;

/// Default collision radius for units without an explicit radius.
pub const DEFAULT_RADIUS: f32 = 10.0;

const fn default_radius() -> f32 {
    DEFAULT_RADIUS
}

/// Data-driven unit definition.
///
/// # Example RON
///
/// ```ron
/// UnitData(
///     health: 80.0,
///     attack: 10.0,
///     attack_cooldown: 0.5,
///     speed: 1.0,
///     range: 125.0,
///     behavior: Ranged,
///     projectile: Some((kind: SingleHit, speed: 2.0, radius: 5.0)),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitData {
    /// Maximum health points.
    pub health: f32,

    /// Base attack power. Healers heal `attack / heal_frames` per tick.
    pub attack: f32,

    /// Seconds between attacks (or spawns, for producers).
    pub attack_cooldown: f32,

    /// Base movement per tick.
    pub speed: f32,

    /// Attack, buff, or heal range.
    pub range: f32,

    /// Collision radius.
    #[serde(default = "default_radius")]
    pub radius: f32,

    /// Damage reduction percent.
    #[serde(default)]
    pub damage_reduction: f32,

    /// Decision archetype.
    pub behavior: Behavior,

    /// Projectile fired when attacking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projectile: Option<ProjectileData>,
}

impl UnitData {
    /// The plain melee unit used for unknown type names.
    #[must_use]
    pub const fn basic() -> Self {
        Self {
            health: 100.0,
            attack: 10.0,
            attack_cooldown: 0.5,
            speed: 1.0,
            range: 25.0,
            radius: DEFAULT_RADIUS,
            damage_reduction: 0.0,
            behavior: Behavior::Melee,
            projectile: None,
        }
    }

    /// Check if this unit fights with projectiles.
    #[must_use]
    pub fn is_ranged(&self) -> bool {
        self.projectile.is_some()
    }

    /// Reject values the simulation cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self, name: &str) -> Result<()> {
        let positive = [("health", self.health), ("radius", self.radius)];
        for (field, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(BattleError::InvalidConfig(format!("{name}.{field} must be positive, got {value}")));
            }
        }
        let non_negative = [
            ("attack", self.attack),
            ("attack_cooldown", self.attack_cooldown),
            ("speed", self.speed),
            ("range", self.range),
            ("damage_reduction", self.damage_reduction),
        ];
        for (field, value) in non_negative {
            if value < 0.0 || !value.is_finite() {
                return Err(BattleError::InvalidConfig(format!(
                    "{name}.{field} must be non-negative, got {value}"
                )));
            }
        }
        if let Some(projectile) = &self.projectile {
            if projectile.speed <= 0.0 || projectile.radius <= 0.0 {
                return Err(BattleError::InvalidConfig(format!(
                    "{name}.projectile needs positive speed and radius"
                )));
            }
        }
        match &self.behavior {
            Behavior::Healer(HealerParams { heal_frames, .. }) if *heal_frames <= 0.0 => Err(
                BattleError::InvalidConfig(format!("{name}.heal_frames must be positive")),
            ),
            Behavior::Producer(ProducerParams { pool, .. }) if pool.is_empty() => Err(
                BattleError::InvalidConfig(format!("{name} producer pool is empty")),
            ),
            _ => Ok(()),
        }
    }
}
