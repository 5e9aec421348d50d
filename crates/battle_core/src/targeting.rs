//! Target and ally selection.

use crate::math::{centroid, Vec2};
use crate::roster::Roster;
use crate::unit::Unit;

/// Nearest unit in `candidates` to `from`.
///
/// Ties keep the first candidate encountered.
pub fn nearest<'a, I>(candidates: I, from: Vec2) -> Option<&'a Unit>
where
    I: IntoIterator<Item = &'a Unit>,
{
    let mut best: Option<(&Unit, f32)> = None;
    for candidate in candidates {
        let d = from.distance(candidate.position);
        if best.map_or(true, |(_, best_d)| d < best_d) {
            best = Some((candidate, d));
        }
    }
    best.map(|(unit, _)| unit)
}

/// Nearest living enemy of `unit`, or `None` if the other team is wiped out.
#[must_use]
pub fn find_optimal_target<'a>(roster: &'a Roster, unit: &Unit) -> Option<&'a Unit> {
    nearest(roster.living().filter(|u| u.team != unit.team), unit.position)
}

/// Allies of a unit, split by whether they are within its range.
#[derive(Debug, Default)]
pub struct Allies<'a> {
    /// Living allies within range, in roster order.
    pub in_range: Vec<&'a Unit>,
    /// Living allies beyond range, in roster order.
    pub others: Vec<&'a Unit>,
    /// Average position of `in_range`, if any.
    pub centroid: Option<Vec2>,
}

impl<'a> Allies<'a> {
    /// Check if there is no living ally at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.in_range.is_empty() && self.others.is_empty()
    }

    /// Nearest ally overall to `from`.
    #[must_use]
    pub fn nearest_to(&self, from: Vec2) -> Option<&'a Unit> {
        nearest(self.in_range.iter().chain(&self.others).copied(), from)
    }
}

/// Living same-team allies of `unit`, excluding itself.
///
/// Support units never count other support units as allies to tend.
#[must_use]
pub fn find_allies_in_range<'a>(roster: &'a Roster, unit: &Unit) -> Allies<'a> {
    let skip_support = unit.is_support();
    let mut allies = Allies::default();
    for other in roster.living() {
        if other.id == unit.id || other.team != unit.team || (skip_support && other.is_support()) {
            continue;
        }
        if unit.position.distance(other.position) <= unit.range {
            allies.in_range.push(other);
        } else {
            allies.others.push(other);
        }
    }
    allies.centroid = centroid(allies.in_range.iter().map(|u| u.position));
    allies
}
