//! Circle overlap and battlefield boundary checks.

use crate::components::{Team, UnitId};
use crate::math::{Bounds, Vec2};
use crate::roster::Roster;

/// Which units a collision query considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamFilter {
    /// Every living unit (movement blocking).
    All,
    /// Only living units not on the given team (projectile hits).
    OpposingTo(Team),
}

impl TeamFilter {
    fn admits(self, team: Team) -> bool {
        match self {
            Self::All => true,
            Self::OpposingTo(own) => team != own,
        }
    }
}

/// First living unit, in roster order, whose circle overlaps the candidate.
///
/// Overlap is strict: circles that merely touch do not collide. Dead units
/// and `exclude` are skipped.
#[must_use]
pub fn unit_collision(
    roster: &Roster,
    candidate: Vec2,
    radius: f32,
    exclude: Option<UnitId>,
    filter: TeamFilter,
) -> Option<UnitId> {
    roster
        .living()
        .filter(|u| Some(u.id) != exclude && filter.admits(u.team))
        .find(|u| candidate.distance(u.position) < radius + u.radius)
        .map(|u| u.id)
}

/// Check whether a circle crosses any battlefield edge.
#[must_use]
pub fn boundary_collision(candidate: Vec2, radius: f32, bounds: Bounds) -> bool {
    candidate.x - radius < 0.0
        || candidate.x + radius > bounds.width
        || candidate.y - radius < 0.0
        || candidate.y + radius > bounds.height
}
