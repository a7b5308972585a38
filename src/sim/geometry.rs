//! Geometry helpers for the arena
//!
//! Reflection off a surface normal, and the circle-vs-segment test used to
//! decide when a ball cuts through another ball's line.

use glam::Vec2;

/// Reflect a velocity off a surface with the given normal.
///
/// The normal does not need to be unit length. A zero normal leaves the
/// velocity unchanged.
#[inline]
pub fn reflect(vel: Vec2, normal: Vec2) -> Vec2 {
    let n = normal.normalize_or_zero();
    if n == Vec2::ZERO {
        return vel;
    }
    vel - 2.0 * vel.dot(n) * n
}

/// Shortest distance from `point` to the segment `a`-`b`.
///
/// Projects onto the segment and clamps to its extents. A degenerate segment
/// (`a == b`) reduces to the distance to `a`.
pub fn distance_point_to_segment(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let ap = point - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return ap.length();
    }
    let t = (ap.dot(ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    (point - closest).length()
}

/// Whether a circle touches or crosses the segment `a`-`b`
#[inline]
pub fn circle_intersects_segment(center: Vec2, radius: f32, a: Vec2, b: Vec2) -> bool {
    distance_point_to_segment(center, a, b) <= radius
}
