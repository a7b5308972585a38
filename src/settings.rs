//! Session settings
//!
//! Collected by the setup screen (or read from a JSON file) and handed to
//! [`crate::Simulation`] once per session. Never mutated afterwards.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_BOUNDARY_RATIO, MIN_BOUNDARY_RATIO};
use crate::error::SettingsError;
use crate::palette::PALETTE;

/// Allowed number of balls per session
pub const MIN_BALLS: usize = 2;
pub const MAX_BALLS: usize = 12;

/// Allowed lines spawned per boundary hit.
///
/// Zero is rejected: a wall bounce that spawns nothing is never a valid
/// session setting. Sessions that must not grow lines (fixed scenarios) keep
/// their balls off the wall instead.
pub const MIN_LINES_PER_HIT: usize = 1;
pub const MAX_LINES_PER_HIT: usize = 10;

/// An RGB ball color. Serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(r, g, b)
    }

    /// Squared euclidean distance in RGB space
    pub fn distance_sq(&self, other: &Color) -> u32 {
        let dr = self.0 as i32 - other.0 as i32;
        let dg = self.1 as i32 - other.1 as i32;
        let db = self.2 as i32 - other.2 as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Slightly lighter shade, used for tether lines
    pub fn line_shade(&self) -> Color {
        let lift = |c: u8| (c as f32 * 0.85 + 255.0 * 0.15).min(255.0) as u8;
        Color(lift(self.0), lift(self.1), lift(self.2))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0, self.1, self.2)
    }
}

/// Game settings for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of balls spawned (2-12)
    pub num_balls: usize,
    /// Lines spawned each time a ball hits the wall (1-10)
    pub lines_per_boundary_hit: usize,
    /// Both balls' speed is multiplied by (1 + factor) after they collide
    pub ball_collision_speed_increase_factor: f32,
    /// Added to a ball's speed (px/s) when it bounces off the wall
    pub boundary_collision_speed_increase: f32,
    /// Arena size relative to the full boundary radius (0.3-1.0)
    pub boundary_radius_ratio: f32,
    /// One unique color per ball; index is the ball id
    pub colors: Vec<Color>,
}

impl Default for Settings {
    fn default() -> Self {
        let num_balls = 6;
        Self {
            num_balls,
            lines_per_boundary_hit: 3,
            ball_collision_speed_increase_factor: 0.12,
            boundary_collision_speed_increase: 25.0,
            boundary_radius_ratio: 0.8,
            colors: PALETTE.iter().take(num_balls).map(|c| c.color).collect(),
        }
    }
}

impl Settings {
    /// Default settings for `num_balls` balls, colored from the palette in order
    pub fn with_ball_count(num_balls: usize) -> Self {
        Self {
            num_balls,
            colors: PALETTE.iter().take(num_balls).map(|c| c.color).collect(),
            ..Self::default()
        }
    }

    /// Check every field against its allowed range.
    ///
    /// `colors` must hold exactly `num_balls` pairwise-distinct entries.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(MIN_BALLS..=MAX_BALLS).contains(&self.num_balls) {
            return Err(SettingsError::BallCount {
                got: self.num_balls,
                min: MIN_BALLS,
                max: MAX_BALLS,
            });
        }
        if !(MIN_LINES_PER_HIT..=MAX_LINES_PER_HIT).contains(&self.lines_per_boundary_hit) {
            return Err(SettingsError::LinesPerHit {
                got: self.lines_per_boundary_hit,
                min: MIN_LINES_PER_HIT,
                max: MAX_LINES_PER_HIT,
            });
        }
        // Written as !(x >= 0) so NaN is rejected too
        if !(self.ball_collision_speed_increase_factor >= 0.0) {
            return Err(SettingsError::NegativeSpeedFactor(
                self.ball_collision_speed_increase_factor,
            ));
        }
        if !(self.boundary_collision_speed_increase >= 0.0) {
            return Err(SettingsError::NegativeBoundaryIncrease(
                self.boundary_collision_speed_increase,
            ));
        }
        if !(MIN_BOUNDARY_RATIO..=MAX_BOUNDARY_RATIO).contains(&self.boundary_radius_ratio) {
            return Err(SettingsError::BoundaryRatio(self.boundary_radius_ratio));
        }
        if self.colors.len() != self.num_balls {
            return Err(SettingsError::ColorCount {
                expected: self.num_balls,
                got: self.colors.len(),
            });
        }
        for (i, color) in self.colors.iter().enumerate() {
            if self.colors[..i].contains(color) {
                return Err(SettingsError::DuplicateColor(*color));
            }
        }
        Ok(())
    }

    /// Parse and validate settings from JSON. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.colors.len(), settings.num_balls);
    }

    #[test]
    fn test_ball_count_out_of_range() {
        let settings = Settings::with_ball_count(1);
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::BallCount { got: 1, .. })
        ));
        let settings = Settings::with_ball_count(13);
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::BallCount { got: 13, .. })
        ));
    }

    #[test]
    fn test_mismatched_color_count() {
        let mut settings = Settings::with_ball_count(4);
        settings.colors.pop();
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::ColorCount {
                expected: 4,
                got: 3
            })
        ));
    }

    #[test]
    fn test_duplicate_colors_rejected() {
        let mut settings = Settings::with_ball_count(3);
        settings.colors[2] = settings.colors[0];
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::DuplicateColor(c)) if c == settings.colors[0]
        ));
    }

    #[test]
    fn test_negative_and_nan_tuning_rejected() {
        let mut settings = Settings::default();
        settings.ball_collision_speed_increase_factor = -0.1;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.boundary_collision_speed_increase = f32::NAN;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.boundary_radius_ratio = 0.2;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::BoundaryRatio(_))
        ));
    }

    #[test]
    fn test_lines_per_hit_range() {
        let mut settings = Settings::default();
        settings.lines_per_boundary_hit = 0;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::LinesPerHit { got: 0, .. })
        ));
        settings.lines_per_boundary_hit = 10;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "num_balls": 2,
            "colors": [[255, 0, 0], [0, 0, 255]],
            "boundary_radius_ratio": 0.5
        }"#;
        let settings = Settings::from_json_str(json).unwrap();
        assert_eq!(settings.num_balls, 2);
        assert_eq!(settings.colors[1], Color(0, 0, 255));
        assert_eq!(settings.lines_per_boundary_hit, 3);
        assert!((settings.boundary_radius_ratio - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_json_validation_runs() {
        // Default colors has 6 entries, so 3 balls mismatches
        let json = r#"{ "num_balls": 3 }"#;
        assert!(matches!(
            Settings::from_json_str(json),
            Err(SettingsError::ColorCount { .. })
        ));
        assert!(matches!(
            Settings::from_json_str("not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_line_shade_is_lighter() {
        let shade = Color(100, 0, 255).line_shade();
        assert!(shade.0 > 100);
        assert!(shade.1 > 0);
        assert!(shade.2 >= 254);
    }
}
