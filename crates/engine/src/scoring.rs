//! Distance ranking and golf-style score accumulation.

use std::collections::BTreeMap;

use crate::models::{Point, Standing, TeamId, TeamScore};

/// Rank one round's guesses against the target.
///
/// Distance is Euclidean in display-pixel space, sorted ascending, ties
/// broken by team id ascending. The team at 0-indexed position `i` is awarded
/// `i + 1` points: the closest guess receives the fewest points (golf
/// scoring). Teams with no guess — possible only under a forced reveal —
/// sort last with infinite distance, still in team-id order, and still
/// receive their positional award, so one round always hands out
/// `N * (N + 1) / 2` points in total.
pub fn rank(entries: &[(TeamId, Option<Point>)], target: Point) -> Vec<Standing> {
    let mut ranked: Vec<(TeamId, f64)> = entries
        .iter()
        .map(|(team, guess)| {
            let distance = guess.map_or(f64::INFINITY, |p| p.distance(target));
            (*team, distance)
        })
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, (team, distance))| Standing {
            team,
            distance,
            rank: i + 1,
            points: (i + 1) as u32,
            geo_km: None,
        })
        .collect()
}

/// Cumulative per-team points for the whole session.
///
/// Totals are monotonically non-decreasing and reset only when a new session
/// (and therefore a new board) is created. Lower is better.
#[derive(Debug, Clone)]
pub struct ScoreBoard {
    totals: BTreeMap<TeamId, u32>,
}

impl ScoreBoard {
    pub fn new(team_count: u8) -> Self {
        ScoreBoard {
            totals: (1..=team_count).map(|team| (team, 0)).collect(),
        }
    }

    /// Add one closed round's awards to the running totals.
    pub fn apply(&mut self, standings: &[Standing]) {
        for standing in standings {
            if let Some(total) = self.totals.get_mut(&standing.team) {
                *total += standing.points;
            }
        }
    }

    pub fn total(&self, team: TeamId) -> u32 {
        self.totals.get(&team).copied().unwrap_or(0)
    }

    /// Rows ordered ascending by total (lowest is winning), ties by team id.
    pub fn sorted_standings(&self) -> Vec<TeamScore> {
        let mut rows: Vec<TeamScore> = self
            .totals
            .iter()
            .map(|(&team, &points)| TeamScore { team, points })
            .collect();
        rows.sort_by(|a, b| a.points.cmp(&b.points).then(a.team.cmp(&b.team)));
        rows
    }
}
