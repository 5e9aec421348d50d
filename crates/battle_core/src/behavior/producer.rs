//! Producer archetype: a stationary structure that pays health for units.
//!
//! Above its health threshold the producer counts down its cooldown and
//! spawns a random kind from its pool next to itself. Once it drops to the
//! threshold it stops spawning and slowly regenerates, and it stays in
//! recovery until it is back at half its maximum.

use std::f32::consts::FRAC_PI_2;

use rand::seq::SliceRandom;
use rand::Rng;

use super::{Context, CooldownAction, Effect, Plan, ProducerParams};
use crate::collision::{boundary_collision, unit_collision, TeamFilter};
use crate::components::{BehaviorState, Team};
use crate::math::Vec2;
use crate::movement::{avoidance_offset, AVOIDANCE_ATTEMPTS};
use crate::unit::Unit;

/// Heading (radians) pointing toward the opposing territory.
#[must_use]
pub fn facing(team: Team) -> f32 {
    match team {
        // Enemy territory is the top half, where y is small
        Team::Player => -FRAC_PI_2,
        Team::Enemy => FRAC_PI_2,
    }
}

/// First free spot around `unit` for a new unit of radius `radius`.
///
/// Candidates sit `unit.radius + radius + gap` away, starting straight
/// toward the enemy and fanning out to both sides in 30° steps.
#[must_use]
pub fn spawn_spot(unit: &Unit, radius: f32, gap: f32, ctx: &Context<'_>) -> Option<Vec2> {
    let distance = unit.radius + radius + gap;
    let heading = facing(unit.team);
    (0..AVOIDANCE_ATTEMPTS)
        .map(|attempt| unit.position + Vec2::from_angle(heading + 2.0 * avoidance_offset(attempt)).scale(distance))
        .find(|p| {
            !boundary_collision(*p, radius, ctx.bounds)
                && unit_collision(ctx.roster, *p, radius, None, TeamFilter::All).is_none()
        })
}

/// Whether the producer should spend this tick recovering.
///
/// Entered at or below the threshold, left only at half of max.
#[must_use]
pub fn is_recovering(unit: &Unit, params: &ProducerParams) -> bool {
    let cap = unit.health.max / 2.0;
    unit.health.current <= params.health_threshold
        || (unit.state == BehaviorState::Recovering && unit.health.current < cap)
}

/// Spawn when ready and healthy, otherwise recover.
pub fn decide<R: Rng + ?Sized>(unit: &Unit, params: &ProducerParams, ctx: &Context<'_>, rng: &mut R) -> Plan {
    if is_recovering(unit, params) {
        let mut plan = Plan::in_state(BehaviorState::Recovering);
        let cap = unit.health.max / 2.0;
        if unit.health.current < cap {
            plan.effects.push(Effect::Regenerate {
                amount: params.regen_per_frame,
                cap,
            });
        }
        return plan;
    }

    let mut plan = Plan::in_state(BehaviorState::Producing);
    if !unit.cooldown.is_ready() {
        plan.cooldown = CooldownAction::Tick;
        return plan;
    }

    // Catalog validation rejects empty pools; params built by hand may still have one
    let Some(&kind) = params.pool.choose(rng) else {
        return plan;
    };
    match spawn_spot(unit, ctx.catalog.get(kind).radius, params.spawn_gap, ctx) {
        Some(position) => {
            plan.effects.push(Effect::Spawn {
                kind,
                position,
                health_cost: params.health_cost,
            });
            plan.cooldown = CooldownAction::Reset;
        }
        None => {
            tracing::debug!(unit = %unit.id, kind = %kind, "No free spot to spawn, retrying next tick");
        }
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::UnitId;
    use crate::data::UnitCatalog;
    use crate::math::Bounds;
    use crate::roster::Roster;
    use crate::unit_kind::UnitKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn barracks(roster: &mut Roster, team: Team, x: f32, y: f32) -> UnitId {
        let catalog = UnitCatalog::standard();
        roster.spawn_unit(UnitKind::Barracks, team, Vec2::new(x, y), catalog.get(UnitKind::Barracks))
    }

    fn params() -> ProducerParams {
        ProducerParams::default()
    }

    #[test]
    fn test_spawns_toward_enemy_when_ready() {
        let catalog = UnitCatalog::standard();
        let mut roster = Roster::new();
        let id = barracks(&mut roster, Team::Player, 300.0, 300.0);
        roster.get_mut(id).unwrap().cooldown.remaining = 0.0;
        let ctx = Context {
            roster: &roster,
            bounds: Bounds::new(600.0, 600.0),
            catalog: &catalog,
        };
        let mut rng = Pcg64::seed_from_u64(7);
        let plan = decide(roster.get(id).unwrap(), &params(), &ctx, &mut rng);
        assert_eq!(plan.state, BehaviorState::Producing);
        assert_eq!(plan.cooldown, CooldownAction::Reset);
        let [Effect::Spawn { kind, position, health_cost }] = plan.effects.as_slice() else {
            panic!("expected spawn, got {:?}", plan.effects);
        };
        assert!(params().pool.contains(kind));
        assert_eq!(*health_cost, 20.0);
        // 10 + 10 + 2 straight up
        assert!((position.x - 300.0).abs() < 1e-4);
        assert!((position.y - 278.0).abs() < 1e-4);
    }

    #[test]
    fn test_blocked_spawn_keeps_cooldown_ready() {
        let catalog = UnitCatalog::standard();
        let mut roster = Roster::new();
        // Tucked in the top-left corner with every open heading occupied
        let id = barracks(&mut roster, Team::Player, 10.0, 10.0);
        roster.get_mut(id).unwrap().cooldown.remaining = 0.0;
        roster.spawn_unit(
            UnitKind::Infantry,
            Team::Player,
            Vec2::new(32.0, 10.0),
            catalog.get(UnitKind::Infantry),
        );
        roster.spawn_unit(
            UnitKind::Infantry,
            Team::Player,
            Vec2::new(10.0, 32.0),
            catalog.get(UnitKind::Infantry),
        );
        roster.spawn_unit(
            UnitKind::Infantry,
            Team::Player,
            Vec2::new(26.0, 26.0),
            catalog.get(UnitKind::Infantry),
        );
        let ctx = Context {
            roster: &roster,
            bounds: Bounds::new(600.0, 600.0),
            catalog: &catalog,
        };
        let mut rng = Pcg64::seed_from_u64(1);
        let plan = decide(roster.get(id).unwrap(), &params(), &ctx, &mut rng);
        assert_eq!(plan.state, BehaviorState::Producing);
        assert_eq!(plan.cooldown, CooldownAction::Hold);
        assert!(plan.effects.is_empty());
    }

    #[test]
    fn test_recovers_below_threshold() {
        let catalog = UnitCatalog::standard();
        let mut roster = Roster::new();
        let id = barracks(&mut roster, Team::Enemy, 300.0, 100.0);
        roster.get_mut(id).unwrap().health.current = 40.0;
        let ctx = Context {
            roster: &roster,
            bounds: Bounds::new(600.0, 600.0),
            catalog: &catalog,
        };
        let mut rng = Pcg64::seed_from_u64(1);
        let plan = decide(roster.get(id).unwrap(), &params(), &ctx, &mut rng);
        assert_eq!(plan.state, BehaviorState::Recovering);
        assert_eq!(
            plan.effects,
            vec![Effect::Regenerate {
                amount: 0.05,
                cap: 100.0
            }]
        );
    }

    #[test]
    fn test_recovery_holds_until_half_health() {
        let catalog = UnitCatalog::standard();
        let mut roster = Roster::new();
        let id = barracks(&mut roster, Team::Player, 300.0, 300.0);
        if let Some(unit) = roster.get_mut(id) {
            unit.health.current = 80.0;
            unit.cooldown.remaining = 0.0;
            unit.state = BehaviorState::Recovering;
        }
        let ctx = Context {
            roster: &roster,
            bounds: Bounds::new(600.0, 600.0),
            catalog: &catalog,
        };
        let mut rng = Pcg64::seed_from_u64(1);
        let plan = decide(roster.get(id).unwrap(), &params(), &ctx, &mut rng);
        assert_eq!(plan.state, BehaviorState::Recovering);
        assert!(matches!(plan.effects.as_slice(), [Effect::Regenerate { .. }]));

        // At half of max it goes back to producing
        roster.get_mut(id).unwrap().health.current = 100.0;
        let ctx = Context {
            roster: &roster,
            bounds: Bounds::new(600.0, 600.0),
            catalog: &catalog,
        };
        let plan = decide(roster.get(id).unwrap(), &params(), &ctx, &mut rng);
        assert_eq!(plan.state, BehaviorState::Producing);
        assert!(matches!(plan.effects.as_slice(), [Effect::Spawn { .. }]));
    }

    #[test]
    fn test_healthy_producer_above_threshold_keeps_producing() {
        let mut roster = Roster::new();
        let id = barracks(&mut roster, Team::Player, 300.0, 300.0);
        roster.get_mut(id).unwrap().health.current = 80.0;
        assert!(!is_recovering(roster.get(id).unwrap(), &params()));
    }

    #[test]
    fn test_empty_pool_spawns_nothing() {
        let catalog = UnitCatalog::standard();
        let mut roster = Roster::new();
        let id = barracks(&mut roster, Team::Player, 300.0, 300.0);
        roster.get_mut(id).unwrap().cooldown.remaining = 0.0;
        let ctx = Context {
            roster: &roster,
            bounds: Bounds::new(600.0, 600.0),
            catalog: &catalog,
        };
        let empty = ProducerParams {
            pool: Vec::new(),
            ..params()
        };
        let mut rng = Pcg64::seed_from_u64(1);
        let plan = decide(roster.get(id).unwrap(), &empty, &ctx, &mut rng);
        assert_eq!(plan.state, BehaviorState::Producing);
        assert!(plan.effects.is_empty());
    }
}
