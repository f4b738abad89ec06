use crate::error::EngineError;
use crate::models::{Point, TeamId};

/// One guess slot per team for the active round.
///
/// Strict duplicate policy: a slot is populated at most once per round, and a
/// second confirmation for the same team fails with `DuplicateGuess`. The
/// alternative (silently overwriting the earlier guess) would let a team
/// revise after seeing others play, so it is rejected deliberately.
#[derive(Debug, Clone)]
pub struct GuessStore {
    slots: Vec<Option<Point>>,
}

impl GuessStore {
    pub fn new(team_count: u8) -> Self {
        GuessStore {
            slots: vec![None; team_count as usize],
        }
    }

    pub fn record(&mut self, team: TeamId, point: Point) -> Result<(), EngineError> {
        let slot = (team as usize)
            .checked_sub(1)
            .and_then(|i| self.slots.get_mut(i))
            .ok_or(EngineError::UnknownTeam(team))?;
        if slot.is_some() {
            return Err(EngineError::DuplicateGuess(team));
        }
        *slot = Some(point);
        Ok(())
    }

    pub fn get(&self, team: TeamId) -> Option<Point> {
        (team as usize)
            .checked_sub(1)
            .and_then(|i| self.slots.get(i))
            .copied()
            .flatten()
    }

    /// True iff every team has a guess in.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Number of teams still to guess.
    pub fn missing(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    /// Clear all slots, at round start.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    /// All slots in team order, filled or not.
    pub fn entries(&self) -> impl Iterator<Item = (TeamId, Option<Point>)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, guess)| ((i + 1) as TeamId, *guess))
    }
}
