//! Planar vector math for the battlefield.
//!
//! The battlefield is a top-down plane measured in pixels, with `x`
//! growing to the right and `y` growing downward. The simulation is a
//! local real-time loop, so plain `f32` is used throughout.

use serde::{Deserialize, Serialize};

/// 2D vector used for positions and directions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Vec2 {
    /// Zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians, measured from +x).
    #[must_use]
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        distance(self.x, self.y, other.x, other.y)
    }

    /// Heading of this vector in radians.
    #[must_use]
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Normalize to unit length. The zero vector stays zero.
    #[must_use]
    pub fn normalize(self) -> Self {
        normalize(self.x, self.y)
    }

    /// Scale by a scalar.
    #[must_use]
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Check both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Distance between `(ax, ay)` and `(bx, by)`.
#[must_use]
pub fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    (bx - ax).hypot(by - ay)
}

/// Normalize `(dx, dy)` to a unit vector.
///
/// Returns [`Vec2::ZERO`] for a zero-length input instead of NaN.
#[must_use]
pub fn normalize(dx: f32, dy: f32) -> Vec2 {
    let len = dx.hypot(dy);
    if len == 0.0 || !len.is_finite() {
        return Vec2::ZERO;
    }
    Vec2::new(dx / len, dy / len)
}

/// Average of a set of points, or `None` when the set is empty.
#[must_use]
pub fn centroid<I>(points: I) -> Option<Vec2>
where
    I: IntoIterator<Item = Vec2>,
{
    let mut sum = Vec2::ZERO;
    let mut count = 0u32;
    for p in points {
        sum = sum + p;
        count += 1;
    }
    (count > 0).then(|| sum.scale(1.0 / count as f32))
}

/// Rectangular battlefield extent, anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Bounds {
    /// Create bounds of the given size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Clamp a circle center so the circle lies inside the bounds.
    #[must_use]
    pub fn clamp_circle(&self, center: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            center.x.min(self.width - radius).max(radius),
            center.y.min(self.height - radius).max(radius),
        )
    }

    /// Check whether a circle lies entirely outside the bounds.
    #[must_use]
    pub fn circle_outside(&self, center: Vec2, radius: f32) -> bool {
        center.x + radius < 0.0
            || center.x - radius > self.width
            || center.y + radius < 0.0
            || center.y - radius > self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        // 3² + 4² = 5²
        assert_eq!(distance(0.0, 0.0, 3.0, 4.0), 5.0);
        assert_eq!(Vec2::new(1.0, 1.0).distance(Vec2::new(4.0, 5.0)), 5.0);
    }

    #[test]
    fn test_normalize() {
        let n = normalize(3.0, 4.0);
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n.x - 0.6).abs() < 1e-6);
        assert!((n.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(normalize(0.0, 0.0), Vec2::ZERO);
    }

    #[test]
    fn test_centroid() {
        let c = centroid([Vec2::new(0.0, 0.0), Vec2::new(10.0, 20.0)]).unwrap();
        assert_eq!(c, Vec2::new(5.0, 10.0));
        assert!(centroid(std::iter::empty()).is_none());
    }

    #[test]
    fn test_clamp_circle() {
        let bounds = Bounds::new(100.0, 50.0);
        let clamped = bounds.clamp_circle(Vec2::new(-5.0, 60.0), 10.0);
        assert_eq!(clamped, Vec2::new(10.0, 40.0));
    }

    #[test]
    fn test_circle_outside() {
        let bounds = Bounds::new(100.0, 100.0);
        assert!(!bounds.circle_outside(Vec2::new(103.0, 50.0), 5.0));
        assert!(bounds.circle_outside(Vec2::new(106.0, 50.0), 5.0));
        assert!(bounds.circle_outside(Vec2::new(50.0, -6.0), 5.0));
    }
}
