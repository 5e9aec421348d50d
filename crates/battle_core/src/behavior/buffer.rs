//! Buffer archetype: keep allies in range buffed and stay with them.

use super::support::{defend, regroup};
use super::{BufferParams, Context, Effect, Plan};
use crate::targeting::find_allies_in_range;
use crate::unit::Unit;

/// Buff every ally in range, release allies that left it, and move to the
/// middle of the group.
#[must_use]
pub fn decide(unit: &Unit, params: &BufferParams, ctx: &Context<'_>) -> Plan {
    let allies = find_allies_in_range(ctx.roster, unit);

    let mut plan = regroup(unit, &allies, allies.centroid, ctx);

    plan.effects.extend(allies.in_range.iter().map(|ally| Effect::Buff {
        ally: ally.id,
        damage_percent: params.damage_percent,
        speed_percent: params.speed_percent,
    }));

    plan.effects.extend(
        ctx.roster
            .units()
            .iter()
            .filter(|other| other.buff_sources.contains(&unit.id))
            .filter(|other| !allies.in_range.iter().any(|a| a.id == other.id))
            .map(|other| Effect::Unbuff { ally: other.id }),
    );

    defend(unit, &mut plan, ctx);
    plan
}
