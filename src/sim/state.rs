//! Session state
//!
//! The [`Simulation`] owns every ball of a session. Balls live in one vector
//! indexed by id and are never removed from it; the alive and eliminated
//! lists hold ids, so the stats screen can still read eliminated balls.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::ball::Ball;
use crate::consts::*;
use crate::error::SettingsError;
use crate::settings::Settings;
use crate::{boundary_radius_for_ratio, polar_to_cartesian};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Two or more balls still in play
    Active,
    /// At most one ball left. Terminal.
    GameOver,
}

/// How a finished session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Exactly one ball survived
    Winner(usize),
    /// The last balls were eliminated in the same tick
    Draw,
}

/// Something that happened during a tick, for sounds and effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A ball hit the wall and attached new lines
    LinesSpawned { ball: usize, count: usize },
    /// `mover` cut `count` of `owner`'s lines
    LinesSevered {
        mover: usize,
        owner: usize,
        count: usize,
    },
    /// A ball lost its last line
    Eliminated { ball: usize },
    /// The session ended; `None` is a draw
    GameOver { winner: Option<usize> },
}

/// One game session
#[derive(Debug, Clone)]
pub struct Simulation {
    pub(super) settings: Settings,
    pub(super) boundary_center: Vec2,
    pub(super) boundary_radius: f32,
    /// Every ball ever spawned, index == id
    pub(super) balls: Vec<Ball>,
    /// Ids still in play, in spawn order
    pub(super) alive: Vec<usize>,
    /// Ids in elimination order, oldest first
    pub(super) eliminated: Vec<usize>,
    pub(super) phase: GamePhase,
    pub(super) outcome: Option<Outcome>,
    /// Simulated seconds since the first update; `None` before it
    pub(super) session_clock: Option<f32>,
    pub(super) events: Vec<GameEvent>,
    pub(super) rng: Pcg32,
    seed: u64,
}

impl Simulation {
    /// Start a session with random placement.
    ///
    /// `settings.colors` must hold `num_balls` distinct colors; invalid
    /// settings are rejected here rather than clamped.
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        Self::with_seed(settings, rand::random())
    }

    /// Start a session from a fixed RNG seed
    pub fn with_seed(settings: Settings, seed: u64) -> Result<Self, SettingsError> {
        let mut sim = Self::empty(settings, seed)?;
        sim.spawn_balls();
        log::info!(
            "Session started: {} balls, boundary radius {:.1}, seed {}",
            sim.balls.len(),
            sim.boundary_radius,
            seed
        );
        Ok(sim)
    }

    /// Build a session around caller-placed balls.
    ///
    /// Ball ids are reassigned to their index in `balls`. Each ball should
    /// start with at least one line.
    pub fn from_balls(settings: Settings, balls: Vec<Ball>) -> Result<Self, SettingsError> {
        let mut sim = Self::empty(settings, rand::random())?;
        for (id, mut ball) in balls.into_iter().enumerate() {
            ball.id = id;
            sim.alive.push(id);
            sim.balls.push(ball);
        }
        Ok(sim)
    }

    fn empty(settings: Settings, seed: u64) -> Result<Self, SettingsError> {
        settings.validate()?;
        let boundary_radius = boundary_radius_for_ratio(settings.boundary_radius_ratio);
        Ok(Self {
            boundary_center: BOUNDARY_CENTER,
            boundary_radius,
            balls: Vec::with_capacity(settings.num_balls),
            alive: Vec::with_capacity(settings.num_balls),
            eliminated: Vec::new(),
            phase: GamePhase::Active,
            outcome: None,
            session_clock: None,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            seed,
            settings,
        })
    }

    /// Throw the current session away and spawn a fresh one with the same
    /// settings.
    pub fn reset(&mut self) {
        self.balls.clear();
        self.alive.clear();
        self.eliminated.clear();
        self.events.clear();
        self.phase = GamePhase::Active;
        self.outcome = None;
        self.session_clock = None;
        self.spawn_balls();
        log::info!("Session reset: {} balls", self.balls.len());
    }

    fn spawn_balls(&mut self) {
        for id in 0..self.settings.num_balls {
            let color = self.settings.colors[id];
            let pos = self.find_free_position().unwrap_or_else(|| {
                log::warn!(
                    "No free spawn position for ball {}, placing at center",
                    crate::ball_label(id)
                );
                self.boundary_center
            });

            let speed = self.rng.random_range(INITIAL_SPEED_MIN..=INITIAL_SPEED_MAX);
            let angle = self.rng.random::<f32>() * TAU;
            let vel = Vec2::from_angle(angle) * speed;

            let mut ball = Ball::new(id, pos, vel, color, BALL_RADIUS);
            ball.add_random_lines(
                &mut self.rng,
                self.boundary_center,
                self.boundary_radius,
                INITIAL_LINES_PER_BALL,
            );
            self.balls.push(ball);
            self.alive.push(id);
        }
    }

    /// Rejection-sample a spawn point well inside the boundary and clear of
    /// the balls placed so far.
    fn find_free_position(&mut self) -> Option<Vec2> {
        let usable = self.boundary_radius - BALL_RADIUS - 2.0;
        for _ in 0..SPAWN_ATTEMPTS_PER_BALL {
            let r = self.rng.random_range(SPAWN_RADIAL_MIN..SPAWN_RADIAL_MAX) * usable;
            let theta = self.rng.random::<f32>() * TAU;
            let candidate = polar_to_cartesian(self.boundary_center, r, theta);
            if self.position_is_free(candidate) {
                return Some(candidate);
            }
        }
        None
    }

    fn position_is_free(&self, pos: Vec2) -> bool {
        if pos.distance(self.boundary_center) + BALL_RADIUS > self.boundary_radius {
            return false;
        }
        self.balls
            .iter()
            .all(|other| pos.distance(other.pos) >= SPAWN_MIN_SEPARATION)
    }

    // === Queries ===

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn boundary_center(&self) -> Vec2 {
        self.boundary_center
    }

    pub fn boundary_radius(&self) -> f32 {
        self.boundary_radius
    }

    /// Balls still in play, in spawn order
    pub fn balls_alive(&self) -> impl Iterator<Item = &Ball> + '_ {
        self.alive.iter().map(|&id| &self.balls[id])
    }

    pub fn alive_count(&self) -> usize {
        self.alive.len()
    }

    /// Every ball of the session, ordered by id
    pub fn all_balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn ball(&self, id: usize) -> Option<&Ball> {
        self.balls.get(id)
    }

    pub fn is_alive(&self, id: usize) -> bool {
        self.alive.contains(&id)
    }

    /// Eliminated balls, first eliminated first
    pub fn eliminated_balls(&self) -> impl Iterator<Item = &Ball> + '_ {
        self.eliminated.iter().map(|&id| &self.balls[id])
    }

    pub fn winner(&self) -> Option<&Ball> {
        match self.outcome {
            Some(Outcome::Winner(id)) => self.balls.get(id),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Simulated seconds since the first update, `None` before it
    pub fn elapsed(&self) -> Option<f32> {
        self.session_clock
    }

    /// Seconds left before lines can be severed
    pub fn grace_remaining(&self) -> f32 {
        (GRACE_PERIOD_DURATION - self.session_clock.unwrap_or(0.0)).max(0.0)
    }

    pub fn in_grace_period(&self) -> bool {
        self.session_clock.unwrap_or(0.0) < GRACE_PERIOD_DURATION
    }

    /// Events recorded since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
