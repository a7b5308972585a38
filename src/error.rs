//! Configuration errors
//!
//! The simulation itself never fails once built; everything that can go
//! wrong is caught when a [`crate::Settings`] is validated.

use thiserror::Error;

use crate::settings::Color;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("number of balls must be between {min} and {max}, got {got}")]
    BallCount { got: usize, min: usize, max: usize },

    #[error("lines per boundary hit must be between {min} and {max}, got {got}")]
    LinesPerHit { got: usize, min: usize, max: usize },

    #[error("ball collision speed factor must be >= 0, got {0}")]
    NegativeSpeedFactor(f32),

    #[error("boundary collision speed increase must be >= 0, got {0}")]
    NegativeBoundaryIncrease(f32),

    #[error("boundary radius ratio must be between 0.3 and 1.0, got {0}")]
    BoundaryRatio(f32),

    #[error("expected one color per ball ({expected}), got {got}")]
    ColorCount { expected: usize, got: usize },

    #[error("color {0} is assigned to more than one ball")]
    DuplicateColor(Color),

    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
}
