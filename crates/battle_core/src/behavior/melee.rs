//! Melee archetype: walk up to the nearest enemy and hit it.

use super::{Context, Effect, Plan};
use crate::components::BehaviorState;
use crate::targeting::find_optimal_target;
use crate::unit::Unit;

/// Approach the nearest enemy, striking it once in range.
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
    plan.act_or_wait(unit, || Effect::Strike {
        target: target.id,
        damage: unit.attack.current,
    });
    plan
}
