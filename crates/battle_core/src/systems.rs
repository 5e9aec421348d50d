//! Simulation systems that run after every unit has acted.
//!
//! Systems are plain functions over the [`Roster`]. The
//! [`Battle`](crate::simulation::Battle) calls them in a fixed order each
//! tick:
//!
//! 1. [`projectile_system`]: advance projectiles and resolve hits
//! 2. [`corpse_system`]: age dead units and clear expired corpses
//! 3. [`outcome_system`]: detect elimination

use crate::collision::{unit_collision, TeamFilter};
use crate::combat::{deal_damage, DamageEvent, DamageKind};
use crate::components::{Team, UnitId, Vitality};
use crate::math::Bounds;
use crate::roster::Roster;
use crate::simulation::Outcome;

/// Results of one projectile pass.
#[derive(Debug, Clone, Default)]
pub struct ProjectileReport {
    /// Damage dealt by impacts and splashes.
    pub damage: Vec<DamageEvent>,
    /// Projectiles that struck a unit.
    pub hits: usize,
    /// Projectiles discarded without hitting anything.
    pub expired: usize,
}

/// Advance every projectile one step.
///
/// A projectile whose next position overlaps a living opposing unit
/// damages that unit (and, for area shots, every other living opposing
/// unit within the splash radius of it) and is removed without moving.
/// Otherwise it moves; it is discarded once it lies wholly outside the
/// battlefield or outlives `lifetime` ticks.
pub fn projectile_system(roster: &mut Roster, bounds: Bounds, lifetime: Option<u32>) -> ProjectileReport {
    let mut report = ProjectileReport::default();
    let mut index = 0;

    while index < roster.projectiles().len() {
        let projectile = roster.projectiles()[index];
        let next = projectile.next_position();

        let hit = unit_collision(
            roster,
            next,
            projectile.radius,
            None,
            TeamFilter::OpposingTo(projectile.team),
        );
        if let Some(target) = hit {
            roster.projectiles_mut().remove(index);
            report.hits += 1;

            let impact = roster.get(target).map(|u| u.position);
            report.damage.extend(deal_damage(
                roster,
                projectile.source,
                target,
                projectile.damage,
                DamageKind::Projectile,
            ));

            if let (Some(splash), Some(center)) = (projectile.splash_radius(), impact) {
                let splashed: Vec<UnitId> = roster
                    .living()
                    .filter(|u| u.team != projectile.team && u.id != target)
                    .filter(|u| u.position.distance(center) < splash)
                    .map(|u| u.id)
                    .collect();
                for victim in splashed {
                    report.damage.extend(deal_damage(
                        roster,
                        projectile.source,
                        victim,
                        projectile.damage,
                        DamageKind::Splash,
                    ));
                }
            }
            continue;
        }

        let aged = projectile.age + 1;
        if bounds.circle_outside(next, projectile.radius) || lifetime.is_some_and(|limit| aged >= limit) {
            roster.projectiles_mut().remove(index);
            report.expired += 1;
            continue;
        }

        let moving = &mut roster.projectiles_mut()[index];
        moving.position = next;
        moving.age = aged;
        index += 1;
    }

    report
}

/// Age every corpse by one tick and remove those older than
/// `corpse_ticks`. Returns the ids removed.
pub fn corpse_system(roster: &mut Roster, corpse_ticks: u32) -> Vec<UnitId> {
    let mut expired = Vec::new();
    for unit in roster.units_mut() {
        if let Vitality::Dead { ticks } = &mut unit.vitality {
            if *ticks >= corpse_ticks {
                expired.push(unit.id);
            } else {
                *ticks += 1;
            }
        }
    }
    for id in &expired {
        roster.remove_unit(*id);
    }
    expired
}

/// Battle outcome once at most one team has living units.
#[must_use]
pub fn outcome_system(roster: &Roster) -> Option<Outcome> {
    let player = roster.living_count(Team::Player);
    let enemy = roster.living_count(Team::Enemy);
    match (player > 0, enemy > 0) {
        (true, true) => None,
        (true, false) => Some(Outcome::Victory(Team::Player)),
        (false, true) => Some(Outcome::Victory(Team::Enemy)),
        (false, false) => Some(Outcome::Draw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::UnitCatalog;
    use crate::math::Vec2;
    use crate::projectile::{Launch, ProjectileData};
    use crate::unit_kind::UnitKind;

    const BOUNDS: Bounds = Bounds::new(400.0, 400.0);

    fn spawn(roster: &mut Roster, kind: UnitKind, team: Team, x: f32, y: f32) -> UnitId {
        let catalog = UnitCatalog::standard();
        roster.spawn_unit(kind, team, Vec2::new(x, y), catalog.get(kind))
    }

    fn fire(roster: &mut Roster, source: UnitId, from: Vec2, aim: Vec2, data: ProjectileData) {
        roster.launch(Launch {
            source,
            team: Team::Player,
            origin: from,
            aim,
            damage: 10.0,
            data,
        });
    }

    #[test]
    fn test_projectile_hits_once() {
        let mut roster = Roster::new();
        let archer = spawn(&mut roster, UnitKind::Archer, Team::Player, 100.0, 300.0);
        let foe = spawn(&mut roster, UnitKind::Infantry, Team::Enemy, 100.0, 285.0);
        fire(&mut roster, archer, Vec2::new(100.0, 300.0), Vec2::new(0.0, -1.0), ProjectileData::single(2.0, 5.0));

        let report = projectile_system(&mut roster, BOUNDS, None);
        assert_eq!(report.hits, 1);
        assert_eq!(report.damage.len(), 1);
        assert_eq!(report.damage[0].target, foe);
        assert!(roster.projectiles().is_empty());
        assert_eq!(roster.get(foe).unwrap().health.current, 90.0);

        let report = projectile_system(&mut roster, BOUNDS, None);
        assert_eq!(report.hits, 0);
        assert_eq!(roster.get(foe).unwrap().health.current, 90.0);
    }

    #[test]
    fn test_projectile_passes_friendly_units() {
        let mut roster = Roster::new();
        let archer = spawn(&mut roster, UnitKind::Archer, Team::Player, 100.0, 300.0);
        spawn(&mut roster, UnitKind::Infantry, Team::Player, 100.0, 285.0);
        fire(&mut roster, archer, Vec2::new(100.0, 300.0), Vec2::new(0.0, -1.0), ProjectileData::single(2.0, 5.0));

        let report = projectile_system(&mut roster, BOUNDS, None);
        assert_eq!(report.hits, 0);
        assert_eq!(roster.projectiles()[0].position, Vec2::new(100.0, 298.0));
        assert_eq!(roster.projectiles()[0].age, 1);
    }

    #[test]
    fn test_area_projectile_splashes_other_enemies() {
        let mut roster = Roster::new();
        let catapult = spawn(&mut roster, UnitKind::Catapult, Team::Player, 100.0, 300.0);
        let struck = spawn(&mut roster, UnitKind::Infantry, Team::Enemy, 100.0, 275.0);
        let near = spawn(&mut roster, UnitKind::Infantry, Team::Enemy, 125.0, 275.0);
        let far = spawn(&mut roster, UnitKind::Infantry, Team::Enemy, 170.0, 275.0);
        let friend = spawn(&mut roster, UnitKind::Infantry, Team::Player, 80.0, 275.0);
        fire(
            &mut roster,
            catapult,
            Vec2::new(100.0, 300.0),
            Vec2::new(0.0, -1.0),
            ProjectileData::area(10.0, 10.0, 30.0),
        );

        let report = projectile_system(&mut roster, BOUNDS, None);
        assert_eq!(report.hits, 1);
        let targets: Vec<_> = report.damage.iter().map(|d| (d.target, d.kind)).collect();
        assert_eq!(targets, vec![(struck, DamageKind::Projectile), (near, DamageKind::Splash)]);
        assert_eq!(roster.get(far).unwrap().health.current, 100.0);
        assert_eq!(roster.get(friend).unwrap().health.current, 100.0);
    }

    #[test]
    fn test_projectiles_expire() {
        let mut roster = Roster::new();
        let archer = spawn(&mut roster, UnitKind::Archer, Team::Player, 100.0, 300.0);
        fire(&mut roster, archer, Vec2::new(3.0, 300.0), Vec2::new(-1.0, 0.0), ProjectileData::single(2.0, 5.0));
        fire(&mut roster, archer, Vec2::new(200.0, 200.0), Vec2::new(1.0, 0.0), ProjectileData::single(2.0, 5.0));

        // First projectile leaves the field after 5 steps; the lifetime cap
        // claims the second at age 10
        let mut expired = 0;
        for _ in 0..10 {
            expired += projectile_system(&mut roster, BOUNDS, Some(10)).expired;
        }
        assert_eq!(expired, 2);
        assert!(roster.projectiles().is_empty());
    }

    #[test]
    fn test_corpses_linger_then_vanish() {
        let mut roster = Roster::new();
        let id = spawn(&mut roster, UnitKind::Infantry, Team::Player, 100.0, 100.0);
        roster.get_mut(id).unwrap().die();
        for _ in 0..3 {
            assert!(corpse_system(&mut roster, 3).is_empty());
        }
        assert_eq!(roster.get(id).unwrap().vitality, Vitality::Dead { ticks: 3 });
        assert_eq!(corpse_system(&mut roster, 3), vec![id]);
        assert!(roster.is_empty());
    }

    #[test]
    fn test_outcome() {
        let mut roster = Roster::new();
        assert_eq!(outcome_system(&roster), Some(Outcome::Draw));
        let a = spawn(&mut roster, UnitKind::Infantry, Team::Player, 100.0, 100.0);
        assert_eq!(outcome_system(&roster), Some(Outcome::Victory(Team::Player)));
        let b = spawn(&mut roster, UnitKind::Infantry, Team::Enemy, 200.0, 100.0);
        assert_eq!(outcome_system(&roster), None);
        roster.get_mut(a).unwrap().die();
        assert_eq!(outcome_system(&roster), Some(Outcome::Victory(Team::Enemy)));
        roster.get_mut(b).unwrap().die();
        assert_eq!(outcome_system(&roster), Some(Outcome::Draw));
    }
}
