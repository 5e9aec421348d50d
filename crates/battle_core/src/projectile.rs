//! Projectiles fired by ranged and support units.
//!
//! A projectile flies in a straight line at a fixed speed and is consumed
//! by the first opposing unit it touches. Area projectiles additionally
//! splash every other opposing unit near the unit they hit. Hit resolution
//! lives in [`systems::projectile_system`](crate::systems::projectile_system).

use serde::{Deserialize, Serialize};

use crate::components::{ProjectileId, Team, UnitId};
use crate::math::{normalize, Vec2};

/// How a projectile deals its damage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Damages only the unit it hits.
    SingleHit,
    /// Damages the unit it hits and every other opposing unit within
    /// `splash_radius` of that unit.
    Area {
        /// Secondary damage radius around the struck unit.
        splash_radius: f32,
    },
}

/// Projectile parameters carried by a unit type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileData {
    /// Damage model.
    pub kind: ProjectileKind,
    /// Travel distance per tick.
    pub speed: f32,
    /// Collision radius.
    pub radius: f32,
}

impl ProjectileData {
    /// Single-hit arrow with the given speed and radius.
    #[must_use]
    pub const fn single(speed: f32, radius: f32) -> Self {
        Self {
            kind: ProjectileKind::SingleHit,
            speed,
            radius,
        }
    }

    /// Area shot with the given speed, radius, and splash radius.
    #[must_use]
    pub const fn area(speed: f32, radius: f32, splash_radius: f32) -> Self {
        Self {
            kind: ProjectileKind::Area { splash_radius },
            speed,
            radius,
        }
    }
}

/// A projectile in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Identifier within the roster.
    pub id: ProjectileId,
    /// Unit that fired it.
    pub source: UnitId,
    /// Team that fired it; only opposing units are hit.
    pub team: Team,
    /// Current position.
    pub position: Vec2,
    /// Unit direction of travel.
    pub direction: Vec2,
    /// Travel distance per tick.
    pub speed: f32,
    /// Collision radius.
    pub radius: f32,
    /// Damage dealt on hit.
    pub damage: f32,
    /// Damage model.
    pub kind: ProjectileKind,
    /// Ticks spent in flight.
    pub age: u32,
}

/// Everything needed to launch a projectile; the roster assigns the id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    /// Unit firing.
    pub source: UnitId,
    /// Firing team.
    pub team: Team,
    /// Muzzle position.
    pub origin: Vec2,
    /// Un-normalized aim vector (target − origin).
    pub aim: Vec2,
    /// Damage carried.
    pub damage: f32,
    /// Projectile parameters.
    pub data: ProjectileData,
}

impl Projectile {
    /// Build a projectile from a launch order.
    #[must_use]
    pub fn new(id: ProjectileId, launch: Launch) -> Self {
        Self {
            id,
            source: launch.source,
            team: launch.team,
            position: launch.origin,
            direction: normalize(launch.aim.x, launch.aim.y),
            speed: launch.data.speed,
            radius: launch.data.radius,
            damage: launch.damage,
            kind: launch.data.kind,
            age: 0,
        }
    }

    /// Position after one more tick of flight.
    #[must_use]
    pub fn next_position(&self) -> Vec2 {
        self.position + self.direction.scale(self.speed)
    }

    /// Splash radius, if this is an area projectile.
    #[must_use]
    pub fn splash_radius(&self) -> Option<f32> {
        match self.kind {
            ProjectileKind::SingleHit => None,
            ProjectileKind::Area { splash_radius } => Some(splash_radius),
        }
    }
}
