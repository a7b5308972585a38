//! Ball entity
//!
//! Each ball owns a set of lines. A line runs from the ball's center to a
//! fixed anchor point on the arena wall; only the anchor is stored.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::geometry::reflect;
use crate::consts::{BOUNDARY_BOUNCE_COOLDOWN, MAX_SPEED};
use crate::polar_to_cartesian;
use crate::settings::Color;

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Spawn index, also the index into `Settings::colors`
    pub id: usize,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Wall anchors of this ball's lines. Anchors never move once created.
    pub lines: Vec<Vec2>,
    /// Seconds until wall contact may spawn lines again
    pub boundary_cooldown: f32,
    /// Lines this ball cut from other balls
    pub lines_removed_by_me: u32,
    /// Lines other balls cut from this one
    pub my_lines_removed_by_others: u32,
}

impl Ball {
    pub fn new(id: usize, pos: Vec2, vel: Vec2, color: Color, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius: radius.max(0.0),
            color,
            lines: Vec::new(),
            boundary_cooldown: 0.0,
            lines_removed_by_me: 0,
            my_lines_removed_by_others: 0,
        }
    }

    /// Builder-style helper to start with fixed anchors
    pub fn with_lines(mut self, anchors: impl IntoIterator<Item = Vec2>) -> Self {
        self.lines.extend(anchors);
        self
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Advance position by one step
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    #[inline]
    pub fn tick_cooldown(&mut self, dt: f32) {
        self.boundary_cooldown = (self.boundary_cooldown - dt).max(0.0);
    }

    /// Attach `count` lines anchored at uniformly random points on the
    /// boundary circle.
    pub fn add_random_lines<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        boundary_center: Vec2,
        boundary_radius: f32,
        count: usize,
    ) {
        self.lines.extend((0..count).map(|_| {
            let theta = rng.random::<f32>() * TAU;
            polar_to_cartesian(boundary_center, boundary_radius, theta)
        }));
    }

    /// Bounce off the circular wall if the ball pokes through it.
    ///
    /// The ball is pushed back inside, its velocity reflected and sped up by
    /// `speed_increase` (capped at [`MAX_SPEED`]). If the spawn cooldown has
    /// run out, `lines_per_hit` new lines are attached and the cooldown reset.
    ///
    /// Returns `None` without wall contact, otherwise the number of lines
    /// spawned (zero while cooling down).
    pub fn handle_boundary<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        boundary_center: Vec2,
        boundary_radius: f32,
        lines_per_hit: usize,
        speed_increase: f32,
    ) -> Option<usize> {
        let offset = self.pos - boundary_center;
        let dist = offset.length();
        if dist + self.radius <= boundary_radius {
            return None;
        }

        let normal = if dist != 0.0 { offset / dist } else { Vec2::X };
        self.pos = boundary_center + normal * (boundary_radius - self.radius);

        self.vel = reflect(self.vel, normal);
        let speed = self.vel.length();
        if speed > 0.0 {
            let boosted = (speed + speed_increase).min(MAX_SPEED);
            self.vel *= boosted / speed;
        }

        if self.boundary_cooldown > 0.0 {
            return Some(0);
        }
        self.add_random_lines(rng, boundary_center, boundary_radius, lines_per_hit);
        self.boundary_cooldown = BOUNDARY_BOUNCE_COOLDOWN;
        Some(lines_per_hit)
    }

    /// One frame of ball-local physics: move, cool down, bounce off the wall.
    ///
    /// Returns the wall contact result from [`Ball::handle_boundary`].
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        dt: f32,
        boundary_center: Vec2,
        boundary_radius: f32,
        lines_per_hit: usize,
        speed_increase: f32,
    ) -> Option<usize> {
        self.integrate(dt);
        self.tick_cooldown(dt);
        self.handle_boundary(
            rng,
            boundary_center,
            boundary_radius,
            lines_per_hit,
            speed_increase,
        )
    }
}
