//! Healer archetype: mend the most wounded allies from behind the line.

use super::support::{defend, regroup};
use super::{Context, Effect, HealerParams, Plan};
use crate::math::{normalize, Vec2};
use crate::targeting::{find_allies_in_range, find_optimal_target};
use crate::unit::Unit;

/// Where a healer stands: `standoff` behind the ally group's centroid,
/// on the side away from the nearest enemy.
#[must_use]
pub fn post(centroid: Vec2, nearest_enemy: Option<Vec2>, standoff: f32) -> Vec2 {
    match nearest_enemy {
        Some(enemy) => centroid + normalize(centroid.x - enemy.x, centroid.y - enemy.y).scale(standoff),
        None => centroid,
    }
}

/// Heal up to `max_targets` damaged allies in range, lowest health first.
#[must_use]
pub fn decide(unit: &Unit, params: &HealerParams, ctx: &Context<'_>) -> Plan {
    let allies = find_allies_in_range(ctx.roster, unit);
    let enemy = find_optimal_target(ctx.roster, unit).map(|e| e.position);
    let station = allies.centroid.map(|c| post(c, enemy, params.standoff));

    let mut plan = regroup(unit, &allies, station, ctx);

    let mut wounded: Vec<&Unit> = allies
        .in_range
        .iter()
        .filter(|ally| !ally.health.is_full())
        .copied()
        .collect();
    wounded.sort_by(|a, b| a.health.current.total_cmp(&b.health.current));

    let amount = unit.attack.current / params.heal_frames;
    plan.effects.extend(
        wounded
            .into_iter()
            .take(params.max_targets)
            .map(|ally| Effect::Heal { ally: ally.id, amount }),
    );

    defend(unit, &mut plan, ctx);
    plan
}
