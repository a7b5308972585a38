//! Simulation module
//!
//! All gameplay logic lives here:
//! - Single-threaded, one `update(dt)` per rendered frame
//! - Stable iteration order (by ball id)
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod geometry;
pub mod state;
pub mod tick;

pub use ball::Ball;
pub use collision::{balls_touch, exchange_normal_velocity, resolve_ball_ball_collision};
pub use geometry::{circle_intersects_segment, distance_point_to_segment, reflect};
pub use state::{GameEvent, GamePhase, Outcome, Simulation};
pub use tick::tick;
