use crate::models::TeamId;

/// Cyclic 1..=N turn rotation.
///
/// Advancing is purely positional: the sequencer keeps no memory of who has
/// already guessed and will happily rotate past a team that is done. Whether
/// guessing is closed is the round controller's decision, not the sequencer's.
#[derive(Debug, Clone)]
pub struct TurnSequencer {
    current: TeamId,
    team_count: u8,
}

impl TurnSequencer {
    pub fn new(team_count: u8) -> Self {
        TurnSequencer {
            current: 1,
            team_count,
        }
    }

    pub fn current(&self) -> TeamId {
        self.current
    }

    /// Rotate to the next team and return it.
    pub fn advance(&mut self) -> TeamId {
        self.current = self.current % self.team_count + 1;
        self.current
    }

    /// Back to team 1, at round start.
    pub fn reset(&mut self) {
        self.current = 1;
    }
}
