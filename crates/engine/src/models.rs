use serde::{Deserialize, Serialize};

/// Teams are numbered 1..=N for the whole session.
pub type TeamId = u8;

pub const MAX_TEAMS: u8 = 10;

/// Marker colors, one per team, reused cyclically past the palette end.
pub const TEAM_PALETTE: [&str; 8] = [
    "#e6194b", "#3cb44b", "#4363d8", "#f58231",
    "#911eb4", "#46f0f0", "#f032e6", "#ffe119",
];

/// Display color for a team id (1-based).
pub fn team_color(team: TeamId) -> &'static str {
    TEAM_PALETTE[(team as usize).saturating_sub(1) % TEAM_PALETTE.len()]
}

/// A point in some pixel space (natural or display, depending on context).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Handle for a map image plus the metadata the host needs to stand in for
/// the renderer's image-ready signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapResource {
    pub display_name: String,
    pub file_name: String,
    pub natural_width: f64,
    pub natural_height: f64,
}

/// One team's ranking entry for a closed round. Derived, never stored.
///
/// `distance` is on-screen (display-pixel) distance to the target; it is
/// infinite for teams that never guessed in a forced reveal. `geo_km` carries
/// the great-circle distance for geo-anchored rounds and is `None` otherwise.
#[derive(Debug, Clone, Serialize)]
pub struct Standing {
    pub team: TeamId,
    pub distance: f64,
    pub rank: usize,
    pub points: u32,
    pub geo_km: Option<f64>,
}

/// One scoreboard row: a team and its cumulative golf score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScore {
    pub team: TeamId,
    pub points: u32,
}
