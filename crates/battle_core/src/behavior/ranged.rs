//! Ranged archetype: close to firing range and shoot.

use super::{launch_at, Context, Effect, Plan};
use crate::components::BehaviorState;
use crate::targeting::find_optimal_target;
use crate::unit::Unit;

/// Attack effect against `target`: a projectile when the unit carries
/// one, a direct strike otherwise.
#[must_use]
pub fn attack(unit: &Unit, target: &Unit) -> Effect {
    match launch_at(unit, target) {
        Some(launch) => Effect::Launch(launch),
        None => Effect::Strike {
            target: target.id,
            damage: unit.attack.current,
        },
    }
}

/// Approach the nearest enemy until it is in range, then fire at it.
#[must_use]
pub fn decide(unit: &Unit, ctx: &Context<'_>) -> Plan {
    let Some(target) = find_optimal_target(ctx.roster, unit) else {
        return Plan::idle();
    };

    if unit.position.distance(target.position) > unit.range {
        let mut plan = Plan::in_state(BehaviorState::Approaching);
        plan.destination = ctx.step(unit, target.position);
        return plan;
    }

    let mut plan = Plan::in_state(BehaviorState::Engaging);
    plan.act_or_wait(unit, || attack(unit, target));
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Team;
    use crate::data::UnitCatalog;
    use crate::math::{Bounds, Vec2};
    use crate::projectile::ProjectileKind;
    use crate::roster::Roster;
    use crate::unit_kind::UnitKind;

    #[test]
    fn test_fires_aimed_projectile() {
        let catalog = UnitCatalog::standard();
        let mut roster = Roster::new();
        let archer = roster.spawn_unit(
            UnitKind::Archer,
            Team::Player,
            Vec2::new(100.0, 200.0),
            catalog.get(UnitKind::Archer),
        );
        roster.spawn_unit(
            UnitKind::Infantry,
            Team::Enemy,
            Vec2::new(100.0, 100.0),
            catalog.get(UnitKind::Infantry),
        );
        roster.get_mut(archer).unwrap().cooldown.remaining = 0.0;

        let ctx = Context {
            roster: &roster,
            bounds: Bounds::new(400.0, 400.0),
            catalog: &catalog,
        };
        let plan = decide(roster.get(archer).unwrap(), &ctx);
        assert_eq!(plan.state, BehaviorState::Engaging);
        let [Effect::Launch(launch)] = plan.effects.as_slice() else {
            panic!("expected a single launch, got {:?}", plan.effects);
        };
        assert_eq!(launch.origin, Vec2::new(100.0, 200.0));
        assert_eq!(launch.aim, Vec2::new(0.0, -100.0));
        assert_eq!(launch.damage, 10.0);
        assert_eq!(launch.data.kind, ProjectileKind::SingleHit);
    }

    #[test]
    fn test_catapult_fires_area_shot() {
        let catalog = UnitCatalog::standard();
        let mut roster = Roster::new();
        let catapult = roster.spawn_unit(
            UnitKind::Catapult,
            Team::Enemy,
            Vec2::new(100.0, 100.0),
            catalog.get(UnitKind::Catapult),
        );
        let target = roster.spawn_unit(
            UnitKind::Infantry,
            Team::Player,
            Vec2::new(100.0, 240.0),
            catalog.get(UnitKind::Infantry),
        );
        let unit = roster.get(catapult).unwrap();
        let effect = attack(unit, roster.get(target).unwrap());
        let Effect::Launch(launch) = effect else {
            panic!("expected launch");
        };
        assert_eq!(launch.data.kind, ProjectileKind::Area { splash_radius: 30.0 });
        assert_eq!(launch.damage, 15.0);
    }
}
