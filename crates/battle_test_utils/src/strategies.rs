//! Proptest strategies for battle properties.
//!
//! These generate random but reproducible inputs for property-based tests
//! of health bounds, movement, and buffs.

use battle_core::math::{Bounds, Vec2};
use battle_core::unit_kind::UnitKind;
use proptest::prelude::*;

/// Any unit kind, including the fallback.
pub fn arb_unit_kind() -> impl Strategy<Value = UnitKind> {
    proptest::sample::select(UnitKind::ALL.to_vec())
}

/// A kind that can move: everything except the stationary producer.
pub fn arb_mobile_kind() -> impl Strategy<Value = UnitKind> {
    proptest::sample::select(
        UnitKind::ALL
            .into_iter()
            .filter(|k| *k != UnitKind::Barracks)
            .collect::<Vec<_>>(),
    )
}

/// A position whose circle of `margin` lies inside `bounds`.
pub fn arb_position(bounds: Bounds, margin: f32) -> impl Strategy<Value = Vec2> {
    (margin..bounds.width - margin, margin..bounds.height - margin).prop_map(|(x, y)| Vec2::new(x, y))
}

/// Any point near the field, including just outside it.
pub fn arb_target(bounds: Bounds) -> impl Strategy<Value = Vec2> {
    (-50.0..bounds.width + 50.0, -50.0..bounds.height + 50.0).prop_map(|(x, y)| Vec2::new(x, y))
}

/// A sequence of incoming hits, including zero and overkill amounts.
pub fn arb_damage_sequence() -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(0.0f32..250.0, 0..40)
}

/// A buff percentage, possibly negative.
pub fn arb_percent() -> impl Strategy<Value = f32> {
    -90.0f32..300.0
}

/// Positions for a crowd of `1..max` bystanders.
pub fn arb_crowd(bounds: Bounds, max: usize) -> impl Strategy<Value = Vec<Vec2>> {
    proptest::collection::vec(arb_position(bounds, 10.0), 1..max)
}
