//! Movement with local avoidance.
//!
//! A unit steps exactly `speed` toward its target each tick. When the
//! straight step is blocked by another unit it fans out over twelve
//! alternative headings, alternating sides in 15° increments, and takes
//! the first free one. When only the battlefield edge is in the way the
//! step is clamped back inside.

use std::f32::consts::PI;

use crate::collision::{boundary_collision, unit_collision, TeamFilter};
use crate::math::{Bounds, Vec2};
use crate::roster::Roster;
use crate::unit::Unit;

/// Number of headings tried when the direct step is blocked.
pub const AVOIDANCE_ATTEMPTS: u32 = 12;

/// Angular increment between avoidance headings.
pub const AVOIDANCE_STEP: f32 = PI / 12.0;

/// Heading offset for avoidance attempt `attempt`.
///
/// Yields 0, +15°, −15°, +30°, −30°, …, +75°, −75°, +90°.
#[must_use]
pub fn avoidance_offset(attempt: u32) -> f32 {
    let magnitude = ((attempt + 1) / 2) as f32 * AVOIDANCE_STEP;
    if attempt % 2 == 1 {
        magnitude
    } else {
        -magnitude
    }
}

/// Where `unit` ends up after one step toward `target`.
///
/// Returns `None` when the unit stays put: it is already at the target,
/// cannot move, or every avoidance heading is blocked.
#[must_use]
pub fn step_toward(roster: &Roster, unit: &Unit, target: Vec2, bounds: Bounds) -> Option<Vec2> {
    let speed = unit.speed.current;
    let delta = target - unit.position;
    let direction = delta.normalize();
    if speed <= 0.0 || direction == Vec2::ZERO {
        return None;
    }

    let blocked_by_unit =
        |p: Vec2| unit_collision(roster, p, unit.radius, Some(unit.id), TeamFilter::All).is_some();
    let blocked_by_edge = |p: Vec2| boundary_collision(p, unit.radius, bounds);

    let naive = unit.position + direction.scale(speed);
    let hits_unit = blocked_by_unit(naive);
    let hits_edge = blocked_by_edge(naive);

    if !hits_unit && !hits_edge {
        return Some(naive);
    }

    if hits_unit {
        let heading = delta.angle();
        return (0..AVOIDANCE_ATTEMPTS)
            .map(|attempt| unit.position + Vec2::from_angle(heading + avoidance_offset(attempt)).scale(speed))
            .find(|p| !blocked_by_unit(*p) && !blocked_by_edge(*p));
    }

    let clamped = bounds.clamp_circle(naive, unit.radius);
    if blocked_by_unit(clamped) {
        tracing::trace!(unit = %unit.id, "Clamped step would overlap a unit; holding position");
        return None;
    }
    Some(clamped)
}
