use thiserror::Error;

use crate::models::TeamId;

/// Recoverable engine conditions, reported to the hosting UI layer for
/// user-facing messaging. None of these is process-fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("team count must be between 1 and 10, got {0}")]
    InvalidTeamCount(u8),
    #[error("round not complete: {missing} team(s) still to guess")]
    RoundNotComplete { missing: usize },
    #[error("team {0} has already guessed this round")]
    DuplicateGuess(TeamId),
    #[error("team {0} is not part of this session")]
    UnknownTeam(TeamId),
    #[error("no active round accepts this action")]
    NoActiveRound,
    #[error("map for the current round is not ready")]
    MapNotReady,
    #[error("bad round configuration: {0}")]
    BadConfig(String),
}
