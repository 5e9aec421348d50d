//! # Battle Core
//!
//! Simulation core for Grid Skirmish, a grid-placement battle simulator.
//!
//! Two teams place units on a grid before the battle starts; afterwards
//! every unit acts on its own according to its archetype until one side
//! is eliminated.
//!
//! This crate contains **only** simulation logic:
//! - No rendering
//! - No IO
//! - Randomness comes from a seeded RNG owned by the battle
//!
//! This separation enables:
//! - Headless drivers and batch runs
//! - Frontends that only read [`snapshot`]s
//! - Reproducible tests
//!
//! ## Crate Structure
//!
//! - [`simulation`] - The [`Battle`](simulation::Battle) session and tick loop
//! - [`behavior`] - Per-archetype decision logic producing plans
//! - [`systems`] - Projectile, corpse, and outcome passes
//! - [`roster`] - Arena of units and projectiles
//! - [`movement`], [`collision`], [`targeting`] - Spatial queries
//! - [`data`] - Unit catalog, loadable from RON
//! - [`math`] - Planar vector math

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod behavior;
pub mod collision;
pub mod combat;
pub mod components;
pub mod config;
pub mod data;
pub mod error;
pub mod grid;
pub mod math;
pub mod movement;
pub mod projectile;
pub mod roster;
pub mod simulation;
pub mod snapshot;
pub mod systems;
pub mod targeting;
pub mod unit;
pub mod unit_kind;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::behavior::{Behavior, BufferParams, HealerParams, ProducerParams};
    pub use crate::combat::{DamageEvent, DamageKind, HealEvent};
    pub use crate::components::*;
    pub use crate::config::BattleConfig;
    pub use crate::data::{UnitCatalog, UnitData};
    pub use crate::error::{BattleError, Result};
    pub use crate::grid::{Cell, Grid};
    pub use crate::math::{Bounds, Vec2};
    pub use crate::projectile::{Projectile, ProjectileData, ProjectileKind};
    pub use crate::roster::Roster;
    pub use crate::simulation::{Battle, Outcome, Phase, TickEvents};
    pub use crate::snapshot::{BattleSnapshot, ProjectileSnapshot, UnitSnapshot};
    pub use crate::unit::Unit;
    pub use crate::unit_kind::UnitKind;
}
