//! Final standings
//!
//! Rankings and the per-ball stats table shown once a session is over.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ball_label;
use crate::palette::color_name;
use crate::settings::Color;
use crate::sim::{Ball, Outcome, Simulation};

/// Number of ranking rows the stats screen has room for
pub const MAX_RANKING_ROWS: usize = 5;

/// One place in the final ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    /// 1-indexed finishing place
    pub place: usize,
    pub ball_id: usize,
    pub color: Color,
    pub color_name: String,
}

/// Per-ball line statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRow {
    pub ball_id: usize,
    pub color: Color,
    pub color_name: String,
    pub lines_removed: u32,
    pub lines_lost: u32,
}

impl StatsRow {
    fn from_ball(ball: &Ball) -> Self {
        Self {
            ball_id: ball.id,
            color: ball.color,
            color_name: color_name(ball.color).to_string(),
            lines_removed: ball.lines_removed_by_me,
            lines_lost: ball.my_lines_removed_by_others,
        }
    }
}

/// Everything the stats screen shows
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Standings {
    /// How the session ended, `None` while it is still running
    pub outcome: Option<Outcome>,
    /// Winner's id, `None` for a draw or an unfinished session
    pub winner: Option<usize>,
    /// Winner first, then eliminated balls from last to first out
    pub rankings: Vec<Ranking>,
    /// One row per ball, in id order
    pub rows: Vec<StatsRow>,
}

impl Standings {
    pub fn from_simulation(sim: &Simulation) -> Self {
        let winner = sim.winner();
        let eliminated: Vec<&Ball> = sim.eliminated_balls().collect();

        let rankings = winner
            .into_iter()
            .chain(eliminated.into_iter().rev())
            .enumerate()
            .map(|(i, ball)| Ranking {
                place: i + 1,
                ball_id: ball.id,
                color: ball.color,
                color_name: color_name(ball.color).to_string(),
            })
            .collect();

        Self {
            outcome: sim.outcome(),
            winner: winner.map(|b| b.id),
            rankings,
            rows: sim.all_balls().iter().map(StatsRow::from_ball).collect(),
        }
    }

    /// Rankings that fit on the stats screen
    pub fn top(&self) -> &[Ranking] {
        &self.rankings[..self.rankings.len().min(MAX_RANKING_ROWS)]
    }

    /// Ball that cut the most lines, lowest id on ties
    pub fn top_cutter(&self) -> Option<&StatsRow> {
        self.rows
            .iter()
            .filter(|row| row.lines_removed > 0)
            .max_by(|a, b| {
                a.lines_removed
                    .cmp(&b.lines_removed)
                    .then(b.ball_id.cmp(&a.ball_id))
            })
    }
}

/// "1st", "2nd", "3rd", "4th", ...
pub fn ordinal(place: usize) -> String {
    let suffix = match (place % 10, place % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{place}{suffix}")
}

impl fmt::Display for Standings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Some(Outcome::Winner(id)) => writeln!(f, "WINNER! Ball {}", ball_label(id))?,
            Some(Outcome::Draw) => writeln!(f, "Everyone Eliminated!")?,
            None => writeln!(f, "Session unfinished")?,
        }

        writeln!(f, "\nFinal Rankings:")?;
        for r in self.top() {
            writeln!(
                f,
                "  {:>4} - Ball {} ({})",
                ordinal(r.place),
                ball_label(r.ball_id),
                r.color_name
            )?;
        }

        writeln!(
            f,
            "\n  {:<6}{:<14}{:>14}{:>12}",
            "Ball", "Color", "Lines Removed", "Lines Lost"
        )?;
        writeln!(f, "  {}", "-".repeat(46))?;
        for row in &self.rows {
            writeln!(
                f,
                "  {:<6}{:<14}{:>14}{:>12}",
                ball_label(row.ball_id),
                row.color_name,
                row.lines_removed,
                row.lines_lost
            )?;
        }
        Ok(())
    }
}
