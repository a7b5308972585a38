//! Per-frame simulation step
//!
//! Pipeline, in order: ball physics and wall bounces, ball-ball collisions,
//! line severance (after the grace period), elimination, victory check.

use super::ball::Ball;
use super::collision::{balls_touch, resolve_ball_ball_collision};
use super::geometry::circle_intersects_segment;
use super::state::{GameEvent, GamePhase, Outcome, Simulation};
use crate::ball_label;
use crate::consts::GRACE_PERIOD_DURATION;

impl Simulation {
    /// Advance the session by `dt` seconds. No-op once the game is over.
    ///
    /// `dt` is used as given; the frame loop is expected to pass sane,
    /// non-negative values.
    pub fn update(&mut self, dt: f32) {
        tick(self, dt);
    }
}

/// Advance the simulation by one frame
pub fn tick(sim: &mut Simulation, dt: f32) {
    if sim.phase == GamePhase::GameOver {
        return;
    }

    // Grace is judged on the time before this frame, so the first update
    // always falls inside it
    let elapsed = sim.session_clock.unwrap_or(0.0);
    sim.session_clock = Some(elapsed + dt);

    move_balls(sim, dt);
    collide_balls(sim);

    if elapsed >= GRACE_PERIOD_DURATION {
        let doomed = sever_lines(sim);
        eliminate(sim, &doomed);
    }

    check_victory(sim);
}

/// Integrate, cool down and bounce every live ball off the wall
fn move_balls(sim: &mut Simulation, dt: f32) {
    let lines_per_hit = sim.settings.lines_per_boundary_hit;
    let speed_increase = sim.settings.boundary_collision_speed_increase;

    for &id in &sim.alive {
        let ball = &mut sim.balls[id];
        let hit = ball.update(
            &mut sim.rng,
            dt,
            sim.boundary_center,
            sim.boundary_radius,
            lines_per_hit,
            speed_increase,
        );
        if let Some(count) = hit.filter(|&n| n > 0) {
            log::debug!(
                "Ball {} hit the wall, +{count} lines ({} total)",
                ball_label(id),
                ball.lines.len()
            );
            sim.events.push(GameEvent::LinesSpawned { ball: id, count });
        }
    }
}

/// Resolve every touching pair once, lower index first
fn collide_balls(sim: &mut Simulation) {
    let factor = sim.settings.ball_collision_speed_increase_factor;
    let n = sim.alive.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = pair_mut(&mut sim.balls, sim.alive[i], sim.alive[j]);
            if balls_touch(a, b) {
                resolve_ball_ball_collision(a, b, factor);
            }
        }
    }
}

/// Mutable references to two distinct balls
fn pair_mut(balls: &mut [Ball], a: usize, b: usize) -> (&mut Ball, &mut Ball) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = balls.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = balls.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}

/// Cut every line a ball passes through.
///
/// Each mover is tested against every other live ball's lines. Every anchor
/// of an owner is tested exactly once per mover, so removing one never
/// skips or double-counts another. Returns the ids that lost their last
/// line, each once, in the order they hit zero.
fn sever_lines(sim: &mut Simulation) -> Vec<usize> {
    let mut doomed = Vec::new();

    for &mover_id in &sim.alive {
        let (mover_pos, mover_radius) = {
            let mover = &sim.balls[mover_id];
            (mover.pos, mover.radius)
        };

        for &owner_id in &sim.alive {
            if owner_id == mover_id {
                continue;
            }
            let owner = &mut sim.balls[owner_id];
            if owner.lines.is_empty() {
                continue;
            }

            let owner_pos = owner.pos;
            let before = owner.lines.len();
            owner
                .lines
                .retain(|&anchor| !circle_intersects_segment(mover_pos, mover_radius, anchor, owner_pos));
            let cut = before - owner.lines.len();
            if cut == 0 {
                continue;
            }

            owner.my_lines_removed_by_others += cut as u32;
            let emptied = owner.lines.is_empty();
            sim.balls[mover_id].lines_removed_by_me += cut as u32;

            log::debug!(
                "Ball {} cut {cut} line(s) of ball {}",
                ball_label(mover_id),
                ball_label(owner_id)
            );
            sim.events.push(GameEvent::LinesSevered {
                mover: mover_id,
                owner: owner_id,
                count: cut,
            });

            if emptied && !doomed.contains(&owner_id) {
                doomed.push(owner_id);
            }
        }
    }

    doomed
}

/// Move doomed balls from the alive list to the elimination order
fn eliminate(sim: &mut Simulation, doomed: &[usize]) {
    if doomed.is_empty() {
        return;
    }
    sim.alive.retain(|id| !doomed.contains(id));
    for &id in doomed {
        sim.eliminated.push(id);
        sim.events.push(GameEvent::Eliminated { ball: id });
        log::info!(
            "Ball {} eliminated ({} left)",
            ball_label(id),
            sim.alive.len()
        );
    }
}

/// End the session once one ball or none is left
fn check_victory(sim: &mut Simulation) {
    let outcome = match sim.alive.as_slice() {
        [winner] => Outcome::Winner(*winner),
        [] => Outcome::Draw,
        _ => return,
    };

    sim.phase = GamePhase::GameOver;
    sim.outcome = Some(outcome);
    let winner = match outcome {
        Outcome::Winner(id) => Some(id),
        Outcome::Draw => None,
    };
    sim.events.push(GameEvent::GameOver { winner });

    match winner {
        Some(id) => log::info!("Game over: ball {} wins", ball_label(id)),
        None => log::info!("Game over: everyone eliminated"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Settings;
    use glam::Vec2;

    fn still_ball(settings: &Settings, id: usize, offset: Vec2) -> Ball {
        Ball::new(
            id,
            BOUNDARY_CENTER + offset,
            Vec2::ZERO,
            settings.colors[id],
            BALL_RADIUS,
        )
    }

    #[test]
    fn test_first_update_starts_clock() {
        let mut sim = Simulation::with_seed(Settings::default(), 1).unwrap();
        sim.update(FRAME_DT);
        assert!((sim.elapsed().unwrap() - FRAME_DT).abs() < 1e-6);
        sim.update(FRAME_DT);
        assert!((sim.elapsed().unwrap() - 2.0 * FRAME_DT).abs() < 1e-6);
    }

    #[test]
    fn test_grace_period_blocks_severance() {
        let settings = Settings::with_ball_count(2);
        let center = BOUNDARY_CENTER;
        // Ball 1 sits right on ball 0's line
        let a = still_ball(&settings, 0, Vec2::new(-100.0, 0.0))
            .with_lines([center + Vec2::new(200.0, 0.0)]);
        let b = still_ball(&settings, 1, Vec2::new(50.0, 0.0))
            .with_lines([center + Vec2::new(0.0, 200.0)]);
        let mut sim = Simulation::from_balls(settings, vec![a, b]).unwrap();

        // A second of frames, each one starting inside the grace period
        for _ in 0..60 {
            sim.update(FRAME_DT);
        }
        assert_eq!(sim.ball(0).unwrap().lines.len(), 1);
        assert_eq!(sim.alive_count(), 2);

        sim.update(FRAME_DT);
        sim.update(FRAME_DT);
        assert!(!sim.in_grace_period());
        assert!(sim.game_over());
        assert_eq!(sim.winner().map(|b| b.id), Some(1));
    }

    #[test]
    fn test_long_first_update_stays_in_grace() {
        let settings = Settings::with_ball_count(2);
        let center = BOUNDARY_CENTER;
        let a = still_ball(&settings, 0, Vec2::new(-100.0, 0.0))
            .with_lines([center + Vec2::new(200.0, 0.0)]);
        let b = still_ball(&settings, 1, Vec2::new(50.0, 0.0))
            .with_lines([center + Vec2::new(0.0, 200.0)]);
        let mut sim = Simulation::from_balls(settings, vec![a, b]).unwrap();

        sim.update(5.0);
        assert_eq!(sim.ball(0).unwrap().lines.len(), 1);
        assert_eq!(sim.alive_count(), 2);
        assert!(!sim.game_over());
        assert!(!sim.in_grace_period());

        sim.update(0.0);
        assert!(sim.game_over());
        assert_eq!(sim.outcome(), Some(Outcome::Winner(1)));
    }

    #[test]
    fn test_severance_counts_each_line_once() {
        let settings = Settings::with_ball_count(3);
        let center = BOUNDARY_CENTER;
        // Ball 0 has two lines running through ball 1, plus one elsewhere
        let a = still_ball(&settings, 0, Vec2::new(-100.0, 0.0)).with_lines([
            center + Vec2::new(200.0, 0.0),
            center + Vec2::new(200.0, 5.0),
            center + Vec2::new(-100.0, -200.0),
        ]);
        let b = still_ball(&settings, 1, Vec2::new(50.0, 0.0))
            .with_lines([center + Vec2::new(0.0, 200.0)]);
        let c = still_ball(&settings, 2, Vec2::new(0.0, -150.0))
            .with_lines([center + Vec2::new(200.0, -150.0)]);
        let mut sim = Simulation::from_balls(settings, vec![a, b, c]).unwrap();

        sim.update(GRACE_PERIOD_DURATION);
        assert_eq!(sim.alive_count(), 3);
        sim.update(FRAME_DT);

        let owner = sim.ball(0).unwrap();
        assert_eq!(owner.lines.len(), 1);
        assert_eq!(owner.my_lines_removed_by_others, 2);
        assert_eq!(sim.ball(1).unwrap().lines_removed_by_me, 2);
        assert_eq!(sim.alive_count(), 3);
        assert!(sim.events().contains(&GameEvent::LinesSevered {
            mover: 1,
            owner: 0,
            count: 2
        }));
    }

    #[test]
    fn test_ball_hit_by_two_movers_is_eliminated_once() {
        let settings = Settings::with_ball_count(3);
        let center = BOUNDARY_CENTER;
        // Ball 0's two lines are each cut by a different ball
        let a = still_ball(&settings, 0, Vec2::ZERO).with_lines([
            center + Vec2::new(200.0, 0.0),
            center + Vec2::new(-200.0, 0.0),
        ]);
        let b = still_ball(&settings, 1, Vec2::new(100.0, 0.0))
            .with_lines([center + Vec2::new(100.0, 200.0)]);
        let c = still_ball(&settings, 2, Vec2::new(-100.0, 0.0))
            .with_lines([center + Vec2::new(-100.0, 200.0)]);
        let mut sim = Simulation::from_balls(settings, vec![a, b, c]).unwrap();

        sim.update(GRACE_PERIOD_DURATION);
        assert_eq!(sim.alive_count(), 3);
        sim.update(FRAME_DT);

        let eliminated: Vec<usize> = sim.eliminated_balls().map(|b| b.id).collect();
        assert_eq!(eliminated, vec![0]);
        assert_eq!(sim.alive_count(), 2);
        assert!(!sim.game_over());
        let eliminations = sim
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Eliminated { .. }))
            .count();
        assert_eq!(eliminations, 1);
    }

    #[test]
    fn test_touching_balls_are_resolved() {
        let settings = Settings::with_ball_count(2);
        let center = BOUNDARY_CENTER;
        let mut a = still_ball(&settings, 0, Vec2::new(-5.0, 0.0))
            .with_lines([center + Vec2::new(0.0, -200.0)]);
        let mut b = still_ball(&settings, 1, Vec2::new(5.0, 0.0))
            .with_lines([center + Vec2::new(0.0, 200.0)]);
        a.vel = Vec2::new(50.0, 0.0);
        b.vel = Vec2::new(-50.0, 0.0);
        let mut sim = Simulation::from_balls(settings, vec![a, b]).unwrap();

        sim.update(0.0);

        let a = sim.ball(0).unwrap();
        let b = sim.ball(1).unwrap();
        assert!(a.pos.distance(b.pos) >= 2.0 * BALL_RADIUS);
        assert!(a.vel.x < 0.0 && b.vel.x > 0.0);
    }

    #[test]
    fn test_update_after_game_over_is_noop() {
        let settings = Settings::with_ball_count(2);
        let center = BOUNDARY_CENTER;
        let a = still_ball(&settings, 0, Vec2::new(-100.0, 0.0))
            .with_lines([center + Vec2::new(200.0, 0.0)]);
        let mut b = still_ball(&settings, 1, Vec2::new(50.0, 0.0))
            .with_lines([center + Vec2::new(0.0, 200.0)]);
        b.vel = Vec2::new(0.0, 10.0);
        let mut sim = Simulation::from_balls(settings, vec![a, b]).unwrap();

        sim.update(GRACE_PERIOD_DURATION);
        sim.update(FRAME_DT);
        assert!(sim.game_over());
        let pos = sim.ball(1).unwrap().pos;
        let clock = sim.elapsed();

        sim.update(1.0);
        assert_eq!(sim.ball(1).unwrap().pos, pos);
        assert_eq!(sim.elapsed(), clock);
        assert_eq!(sim.outcome(), Some(Outcome::Winner(1)));
    }

    #[test]
    fn test_random_session_only_loses_balls() {
        let mut sim = Simulation::with_seed(Settings::default(), 2024).unwrap();
        let mut alive = sim.alive_count();
        for _ in 0..36_000 {
            sim.update(FRAME_DT);
            assert!(sim.alive_count() <= alive);
            alive = sim.alive_count();
            if sim.game_over() {
                break;
            }
        }
        assert_eq!(
            sim.all_balls().len(),
            sim.alive_count() + sim.eliminated_balls().count()
        );
        assert_eq!(sim.game_over(), sim.alive_count() <= 1);
        for ball in sim.balls_alive() {
            assert!(ball.pos.is_finite());
            assert!(ball.speed() <= MAX_SPEED + 1e-2);
        }
    }

    #[test]
    fn test_pair_mut_either_order() {
        let settings = Settings::with_ball_count(3);
        let mut balls: Vec<Ball> = (0..3)
            .map(|i| still_ball(&settings, i, Vec2::new(i as f32, 0.0)))
            .collect();
        let (x, y) = pair_mut(&mut balls, 2, 0);
        assert_eq!((x.id, y.id), (2, 0));
        let (x, y) = pair_mut(&mut balls, 0, 2);
        assert_eq!((x.id, y.id), (0, 2));
    }
}
