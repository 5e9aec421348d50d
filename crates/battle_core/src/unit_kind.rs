//! Unit kind identity.
//!
//! [`UnitKind`] is the tag half of the data-driven unit descriptor: it
//! names a unit type, while the matching [`UnitData`](crate::data::UnitData)
//! in the [`UnitCatalog`](crate::data::UnitCatalog) carries its numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag identifying a unit type.
///
/// Parsing from a name never fails: unknown names fall back to
/// [`UnitKind::Basic`], a plain melee unit.
///
/// # Example
///
/// ```
/// use battle_core::unit_kind::UnitKind;
///
/// assert_eq!(UnitKind::from_name("Archer"), UnitKind::Archer);
/// assert_eq!(UnitKind::from_name("Dragon"), UnitKind::Basic);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKind {
    /// Well-rounded melee fighter.
    Infantry,
    /// Ranged unit firing single-hit arrows.
    Archer,
    /// Slow ranged unit lobbing area-of-effect shots.
    Catapult,
    /// Armored melee fighter.
    HeavyInfantry,
    /// Support unit that buffs nearby allies.
    Commander,
    /// Support unit that heals nearby allies.
    Medic,
    /// Stationary structure that spawns fresh units.
    Barracks,
    /// Plain melee unit used for unknown type names.
    Basic,
}

impl UnitKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 8] = [
        Self::Infantry,
        Self::Archer,
        Self::Catapult,
        Self::HeavyInfantry,
        Self::Commander,
        Self::Medic,
        Self::Barracks,
        Self::Basic,
    ];

    /// Kinds selectable by default (everything except the fallback).
    pub const PLACEABLE: [Self; 7] = [
        Self::Infantry,
        Self::Archer,
        Self::Catapult,
        Self::HeavyInfantry,
        Self::Commander,
        Self::Medic,
        Self::Barracks,
    ];

    /// Resolve a type name, falling back to [`UnitKind::Basic`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match Self::lookup(name) {
            Some(kind) => kind,
            None => {
                tracing::debug!(name, "Unknown unit type, using basic melee unit");
                Self::Basic
            }
        }
    }

    /// Resolve a type name exactly (case-insensitive, `_`/`-` ignored).
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().to_ascii_lowercase() == normalized)
    }

    /// Display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Infantry => "Infantry",
            Self::Archer => "Archer",
            Self::Catapult => "Catapult",
            Self::HeavyInfantry => "HeavyInfantry",
            Self::Commander => "Commander",
            Self::Medic => "Medic",
            Self::Barracks => "Barracks",
            Self::Basic => "Basic",
        }
    }

    /// One-line description shown by hover tooltips.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Infantry => "The general combat unit, well rounded, built for melee",
            Self::Archer => {
                "Weaker yet fires a projectile at whoever is in its range and is the closest"
            }
            Self::Catapult => "Slow siege engine whose shots splash every enemy near the impact",
            Self::HeavyInfantry => "Armored melee unit that shrugs off most incoming damage",
            Self::Commander => "The general buffer, gives all nearby units an attack and speed buff",
            Self::Medic => "Keeps the most wounded nearby allies alive from behind the line",
            Self::Barracks => "Stationary building that trades its own health for new recruits",
            Self::Basic => "A plain melee unit",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for UnitKind {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}
