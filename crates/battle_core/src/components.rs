//! Component definitions.
//!
//! Components are small pieces of pure data that a [`Unit`](crate::unit::Unit)
//! is composed of. They carry their own bookkeeping (clamping, cooldown
//! decay, buff recomputation) but no decision logic.

use serde::{Deserialize, Serialize};

/// Seconds of cooldown that elapse in one frame at normal speed.
pub const COOLDOWN_STEP: f32 = 1.0 / 60.0;

/// Stable identifier for a unit within one battle session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Stable identifier for a projectile within one battle session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(pub u32);

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Side a unit fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    /// Bottom half of the battlefield.
    Player,
    /// Top half of the battlefield.
    Enemy,
}

impl Team {
    /// The opposing team.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Enemy => "enemy",
        }
    }
}

/// Health component for damageable units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    /// Current health points, always within `[0, max]`.
    pub current: f32,
    /// Maximum health points.
    pub max: f32,
}

impl Health {
    /// Create a health component at full health.
    #[must_use]
    pub const fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Check if health has run out.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Check if at full health.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Subtract damage, clamping at zero. Returns the health actually lost.
    pub fn apply_damage(&mut self, amount: f32) -> f32 {
        let before = self.current;
        self.current = (self.current - amount.max(0.0)).max(0.0);
        before - self.current
    }

    /// Heal up to `cap` (itself clamped to max). Returns the amount healed.
    pub fn heal_up_to(&mut self, amount: f32, cap: f32) -> f32 {
        let cap = cap.min(self.max);
        if self.current >= cap {
            return 0.0;
        }
        let before = self.current;
        self.current = (self.current + amount.max(0.0)).min(cap);
        self.current - before
    }

    /// Heal up to max. Returns the amount healed.
    pub fn heal(&mut self, amount: f32) -> f32 {
        self.heal_up_to(amount, self.max)
    }

    /// Current health as a fraction of max.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }
}

/// A buffable stat with an original baseline.
///
/// Buffs always recompute from `base`, so applying the same percentage
/// twice leaves the stat where one application put it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    /// Original value.
    pub base: f32,
    /// Value in effect this tick.
    pub current: f32,
}

impl Stat {
    /// Create an unbuffed stat.
    #[must_use]
    pub const fn new(base: f32) -> Self {
        Self {
            base,
            current: base,
        }
    }

    /// Set `current` to `round(base + base × percent / 100)`.
    pub fn apply_percent(&mut self, percent: f32) {
        self.current = (self.base + self.base * (percent / 100.0)).round();
    }

    /// Drop any buff.
    pub fn reset(&mut self) {
        self.current = self.base;
    }

    /// Check whether a buff is in effect.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.current != self.base
    }
}

/// Attack (or spawn) cooldown measured in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cooldown {
    /// Seconds between actions.
    pub period: f32,
    /// Seconds left before the next action.
    pub remaining: f32,
}

impl Cooldown {
    /// Create a cooldown that starts fully wound.
    #[must_use]
    pub const fn new(period: f32) -> Self {
        Self {
            period,
            remaining: period,
        }
    }

    /// Check if ready to act.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Wind the cooldown back up after acting.
    pub fn reset(&mut self) {
        self.remaining = self.period;
    }

    /// Decay by one frame scaled by `elapsed`.
    pub fn tick(&mut self, elapsed: f32) {
        self.remaining -= COOLDOWN_STEP * elapsed;
    }
}

/// Alive/dead lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vitality {
    /// Fighting.
    #[default]
    Alive,
    /// Inert corpse waiting to be cleared from the roster.
    Dead {
        /// Ticks elapsed since death.
        ticks: u32,
    },
}

/// Per-unit behavior state, re-evaluated every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorState {
    /// Nothing to do this tick.
    #[default]
    Idle,
    /// Moving toward a target beyond range.
    Approaching,
    /// Target in range; attacking or waiting on cooldown.
    Engaging,
    /// Support unit tending allies in range.
    Supporting,
    /// Support unit with no ally in range, regrouping with the nearest ally.
    Fleeing,
    /// Support unit with no living ally, fighting on its own.
    Aggro,
    /// Producer healthy enough to spawn units.
    Producing,
    /// Producer below its threshold, regenerating instead of spawning.
    Recovering,
}

impl BehaviorState {
    /// States in which a support unit fires at its full range.
    #[must_use]
    pub const fn is_cornered(self) -> bool {
        matches!(self, Self::Fleeing | Self::Aggro)
    }
}
