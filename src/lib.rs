//! Vector Balls - last ball standing in a circular arena
//!
//! Core modules:
//! - `sim`: Simulation (physics, line severance, elimination)
//! - `settings`: Session configuration supplied by the setup screen
//! - `palette`: Named ball colors
//! - `standings`: Final rankings and stats table
//!
//! There is no rendering here. A presentation layer builds a [`Settings`],
//! constructs a [`Simulation`], calls [`Simulation::update`] once per frame
//! and draws from the read-only queries.

pub mod error;
pub mod palette;
pub mod settings;
pub mod sim;
pub mod standings;

pub use error::SettingsError;
pub use settings::{Color, Settings};
pub use sim::{Ball, GameEvent, GamePhase, Outcome, Simulation};
pub use standings::Standings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Frame delta used by the headless runner (60 FPS)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Arena
    pub const BOUNDARY_CENTER: Vec2 = Vec2::new(500.0, 500.0);
    pub const BASE_BOUNDARY_RADIUS: f32 = 345.0; // (1000 / 2 - 40) * 0.75
    pub const MIN_BOUNDARY_RATIO: f32 = 0.3;
    pub const MAX_BOUNDARY_RATIO: f32 = 1.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 12.0;
    pub const INITIAL_SPEED_MIN: f32 = 160.0;
    pub const INITIAL_SPEED_MAX: f32 = 240.0;
    /// Cap on absolute speed to keep the simulation stable
    pub const MAX_SPEED: f32 = 700.0;

    /// Lines
    pub const INITIAL_LINES_PER_BALL: usize = 3;
    /// Seconds before a ball may spawn lines again after a wall hit
    pub const BOUNDARY_BOUNCE_COOLDOWN: f32 = 0.12;
    /// Seconds at session start during which no line can be severed
    pub const GRACE_PERIOD_DURATION: f32 = 1.0;

    /// Ball-ball separation nudge added on top of half the overlap
    pub const SEPARATION_SLOP: f32 = 0.1;

    /// Spawn placement
    pub const SPAWN_ATTEMPTS_PER_BALL: usize = 1000;
    pub const SPAWN_MIN_SEPARATION: f32 = BALL_RADIUS * 2.2;
    pub const SPAWN_RADIAL_MIN: f32 = 0.15;
    pub const SPAWN_RADIAL_MAX: f32 = 0.75;
}

/// Convert polar (r, theta) around `center` to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(center: Vec2, r: f32, theta: f32) -> Vec2 {
    center + Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Player-facing ball label, 1-based: id 0 is `#1`
#[inline]
pub fn ball_label(id: usize) -> String {
    format!("#{}", id + 1)
}

/// Boundary radius for a given size ratio, ratio clamped to the allowed range
#[inline]
pub fn boundary_radius_for_ratio(ratio: f32) -> f32 {
    consts::BASE_BOUNDARY_RADIUS
        * ratio.clamp(consts::MIN_BOUNDARY_RATIO, consts::MAX_BOUNDARY_RATIO)
}
