//! Damage, healing, and death resolution.
//!
//! Every health change in a battle goes through this module so that
//! deaths are handled the same way no matter what caused them: the victim
//! turns into an inert corpse and any buff it was providing is released
//! in the same tick.

use serde::{Deserialize, Serialize};

use crate::components::UnitId;
use crate::roster::Roster;

/// How damage was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    /// Melee strike.
    Direct,
    /// Projectile impact.
    Projectile,
    /// Area splash around a projectile impact.
    Splash,
}

/// Damage dealt to a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    /// Unit that dealt the damage.
    pub attacker: UnitId,
    /// Unit that received it.
    pub target: UnitId,
    /// Health actually lost, after reduction and clamping.
    pub amount: f32,
    /// Delivery.
    pub kind: DamageKind,
    /// Whether this hit killed the target.
    pub lethal: bool,
}

/// Health restored to a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealEvent {
    /// Unit doing the healing.
    pub healer: UnitId,
    /// Unit healed.
    pub ally: UnitId,
    /// Health actually restored.
    pub amount: f32,
}

/// Damage `target` on behalf of `attacker`.
///
/// Returns `None` if the target is gone or already dead.
pub fn deal_damage(
    roster: &mut Roster,
    attacker: UnitId,
    target: UnitId,
    damage: f32,
    kind: DamageKind,
) -> Option<DamageEvent> {
    let unit = roster.get_mut(target)?;
    if unit.is_dead() {
        return None;
    }
    let amount = unit.take_damage(damage);
    let lethal = unit.is_dead();
    if lethal {
        tracing::debug!(victim = %target, killer = %attacker, kind = %unit.kind, "Unit died");
        roster.release_buffs_from(target);
    }
    Some(DamageEvent {
        attacker,
        target,
        amount,
        kind,
        lethal,
    })
}

/// Deduct `cost` health from `unit` directly, bypassing damage reduction.
///
/// Returns `true` if paying killed the unit.
pub fn pay_health(roster: &mut Roster, unit: UnitId, cost: f32) -> bool {
    let Some(payer) = roster.get_mut(unit) else {
        return false;
    };
    if payer.is_dead() {
        return false;
    }
    payer.health.apply_damage(cost);
    if !payer.health.is_depleted() {
        return false;
    }
    payer.die();
    tracing::debug!(unit = %unit, "Unit spent its last health");
    roster.release_buffs_from(unit);
    true
}

/// Heal a living `ally` by `amount`, capped at its max health.
///
/// Returns `None` if nothing was restored.
pub fn heal(roster: &mut Roster, healer: UnitId, ally: UnitId, amount: f32) -> Option<HealEvent> {
    let unit = roster.get_mut(ally)?;
    if unit.is_dead() {
        return None;
    }
    let restored = unit.health.heal(amount);
    (restored > 0.0).then_some(HealEvent {
        healer,
        ally,
        amount: restored,
    })
}
