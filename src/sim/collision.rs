//! Ball-ball collision response
//!
//! All balls have the same mass, so an elastic collision reduces to swapping
//! the velocity components along the contact normal. Overlapping balls are
//! pushed apart first so they do not stick together on the next tick.

use glam::Vec2;

use super::ball::Ball;
use crate::consts::{MAX_SPEED, SEPARATION_SLOP};

/// Whether two balls' bounding circles touch or overlap
#[inline]
pub fn balls_touch(a: &Ball, b: &Ball) -> bool {
    a.pos.distance(b.pos) <= a.radius + b.radius
}

/// Resolve a collision between two touching balls.
///
/// Separates them symmetrically along the line of centers, exchanges the
/// normal velocity components, then scales each speed by
/// `1 + speed_factor` (capped at [`MAX_SPEED`]).
///
/// Callers check [`balls_touch`] first.
pub fn resolve_ball_ball_collision(a: &mut Ball, b: &mut Ball, speed_factor: f32) {
    let mut delta = b.pos - a.pos;
    let mut distance = delta.length();
    let min_distance = a.radius + b.radius;

    // Coincident centers: pick an arbitrary separation axis
    if distance == 0.0 {
        delta = Vec2::X;
        distance = 1.0;
    }

    let overlap = min_distance - distance;
    if overlap > 0.0 {
        let correction = (delta / distance) * (overlap / 2.0 + SEPARATION_SLOP);
        a.pos -= correction;
        b.pos += correction;
    }

    let n = (b.pos - a.pos).normalize_or_zero();
    if n == Vec2::ZERO {
        return;
    }

    exchange_normal_velocity(&mut a.vel, &mut b.vel, n);

    a.vel = boost_speed(a.vel, speed_factor);
    b.vel = boost_speed(b.vel, speed_factor);
}

/// Swap the components of two velocities along unit normal `n`, keeping the
/// tangential components.
pub fn exchange_normal_velocity(a_vel: &mut Vec2, b_vel: &mut Vec2, n: Vec2) {
    let t = n.perp();

    let a_vn = a_vel.dot(n);
    let a_vt = a_vel.dot(t);
    let b_vn = b_vel.dot(n);
    let b_vt = b_vel.dot(t);

    *a_vel = b_vn * n + a_vt * t;
    *b_vel = a_vn * n + b_vt * t;
}

/// Multiply speed by `1 + factor`, capped at [`MAX_SPEED`]. Zero stays zero.
#[inline]
fn boost_speed(vel: Vec2, factor: f32) -> Vec2 {
    let speed = vel.length();
    if speed > 0.0 {
        vel * ((speed * (1.0 + factor)).min(MAX_SPEED) / speed)
    } else {
        vel
    }
}
