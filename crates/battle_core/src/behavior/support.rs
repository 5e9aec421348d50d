//! Regroup and self-defense rules shared by buffers and healers.
//!
//! A support unit with allies in range is **Supporting** and holds a post
//! chosen by its archetype. With no ally in range it is **Fleeing** toward
//! the nearest living ally. With no living ally left it turns **Aggro** and
//! closes on the nearest enemy. In every state it fires at the nearest
//! enemy once that enemy is close enough: half its range while
//! supporting, its full range when cornered.

use super::ranged::attack;
use super::{Context, Plan};
use crate::components::BehaviorState;
use crate::math::Vec2;
use crate::targeting::{find_optimal_target, Allies};
use crate::unit::Unit;

/// Distance from its post below which a support unit stops moving.
pub const ARRIVAL_DISTANCE: f32 = 1.0;

/// Movement half of a support unit's plan.
///
/// `post` is where the unit wants to stand while supporting.
#[must_use]
pub fn regroup(unit: &Unit, allies: &Allies<'_>, post: Option<Vec2>, ctx: &Context<'_>) -> Plan {
    if allies.centroid.is_some() {
        let mut plan = Plan::in_state(BehaviorState::Supporting);
        if let Some(post) = post {
            if unit.position.distance(post) > ARRIVAL_DISTANCE {
                plan.destination = ctx.step(unit, post);
            }
        }
        return plan;
    }

    if let Some(ally) = allies.nearest_to(unit.position) {
        let mut plan = Plan::in_state(BehaviorState::Fleeing);
        plan.destination = ctx.step(unit, ally.position);
        return plan;
    }

    let Some(enemy) = find_optimal_target(ctx.roster, unit) else {
        return Plan::idle();
    };
    let mut plan = Plan::in_state(BehaviorState::Aggro);
    if unit.position.distance(enemy.position) > unit.range {
        plan.destination = ctx.step(unit, enemy.position);
    }
    plan
}

/// Firing reach for a support unit in `state`.
#[must_use]
pub fn reach(unit: &Unit, state: BehaviorState) -> f32 {
    if state.is_cornered() {
        unit.range
    } else {
        unit.range / 2.0
    }
}

/// Attack half of a support unit's plan: fire at the nearest enemy if it
/// is within reach.
pub fn defend(unit: &Unit, plan: &mut Plan, ctx: &Context<'_>) {
    if unit.attack.base <= 0.0 {
        return;
    }
    let Some(enemy) = find_optimal_target(ctx.roster, unit) else {
        return;
    };
    if unit.position.distance(enemy.position) <= reach(unit, plan.state) {
        plan.act_or_wait(unit, || attack(unit, enemy));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{CooldownAction, Effect};
    use crate::components::Team;
    use crate::data::UnitCatalog;
    use crate::math::Bounds;
    use crate::roster::Roster;
    use crate::targeting::find_allies_in_range;
    use crate::unit_kind::UnitKind;

    const BOUNDS: Bounds = Bounds::new(600.0, 600.0);

    fn spawn(roster: &mut Roster, kind: UnitKind, team: Team, x: f32, y: f32) -> crate::components::UnitId {
        let catalog = UnitCatalog::standard();
        roster.spawn_unit(kind, team, Vec2::new(x, y), catalog.get(kind))
    }

    #[test]
    fn test_flees_toward_nearest_ally() {
        let catalog = UnitCatalog::standard();
        let mut roster = Roster::new();
        let commander = spawn(&mut roster, UnitKind::Commander, Team::Player, 300.0, 300.0);
        spawn(&mut roster, UnitKind::Infantry, Team::Player, 300.0, 500.0);
        spawn(&mut roster, UnitKind::Infantry, Team::Player, 400.0, 300.0);
        let ctx = Context {
            roster: &roster,
            bounds: BOUNDS,
            catalog: &catalog,
        };
        let unit = roster.get(commander).unwrap();
        let allies = find_allies_in_range(&roster, unit);
        let plan = regroup(unit, &allies, allies.centroid, &ctx);
        assert_eq!(plan.state, BehaviorState::Fleeing);
        assert_eq!(plan.destination, Some(Vec2::new(301.5, 300.0)));
    }

    #[test]
    fn test_aggro_without_allies_fires_at_full_range() {
        let catalog = UnitCatalog::standard();
        let mut roster = Roster::new();
        let commander = spawn(&mut roster, UnitKind::Commander, Team::Player, 300.0, 300.0);
        let foe = spawn(&mut roster, UnitKind::Infantry, Team::Enemy, 300.0, 260.0);
        // Support allies do not count
        spawn(&mut roster, UnitKind::Medic, Team::Player, 320.0, 300.0);
        roster.get_mut(commander).unwrap().cooldown.remaining = 0.0;

        let ctx = Context {
            roster: &roster,
            bounds: BOUNDS,
            catalog: &catalog,
        };
        let unit = roster.get(commander).unwrap();
        let allies = find_allies_in_range(&roster, unit);
        let mut plan = regroup(unit, &allies, allies.centroid, &ctx);
        assert_eq!(plan.state, BehaviorState::Aggro);
        assert_eq!(plan.destination, None);

        defend(unit, &mut plan, &ctx);
        assert_eq!(plan.cooldown, CooldownAction::Reset);
        assert!(matches!(plan.effects.as_slice(), [Effect::Launch(l)] if l.aim == Vec2::new(0.0, -40.0)));
        assert!(roster.get(foe).is_some());
    }

    #[test]
    fn test_supporting_holds_fire_beyond_half_range() {
        let catalog = UnitCatalog::standard();
        let mut roster = Roster::new();
        let commander = spawn(&mut roster, UnitKind::Commander, Team::Player, 300.0, 300.0);
        spawn(&mut roster, UnitKind::Infantry, Team::Player, 300.0, 320.0);
        spawn(&mut roster, UnitKind::Infantry, Team::Enemy, 300.0, 260.0);
        roster.get_mut(commander).unwrap().cooldown.remaining = 0.0;

        let ctx = Context {
            roster: &roster,
            bounds: BOUNDS,
            catalog: &catalog,
        };
        let unit = roster.get(commander).unwrap();
        let mut plan = Plan::in_state(BehaviorState::Supporting);
        defend(unit, &mut plan, &ctx);
        // 40 px away, half range is 25
        assert!(plan.effects.is_empty());
        assert_eq!(plan.cooldown, CooldownAction::Hold);
    }
}
