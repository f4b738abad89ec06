//! The round controller: one finite-state machine owning a whole session.
//!
//! All session state lives in the [`Session`] value and is mutated only
//! inside [`Session::handle`]. The hosting UI feeds discrete inputs in and
//! consumes the emitted outputs to redraw; it is never a second writer.

use serde::Serialize;
use uuid::Uuid;

use crate::config::{RoundConfig, SessionConfig};
use crate::error::EngineError;
use crate::geometry::{haversine_km, GeometryMapper};
use crate::guesses::GuessStore;
use crate::models::{MapResource, Point, Standing, TeamId, TeamScore};
use crate::scoring::{self, ScoreBoard};
use crate::turn::TurnSequencer;

/// Life-cycle phase of the active round.
///
/// `Loading` gates on the renderer's image-ready signal; guess and reveal
/// inputs are refused until the map is up. The only re-entrant loop is
/// `AwaitingGuesses` ⇄ `AllGuessesIn`; `SessionComplete` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    AwaitingGuesses,
    AllGuessesIn,
    Revealed,
    SessionComplete,
}

/// Discrete inputs dispatched by the host event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// The renderer finished decoding the round's map and reports its
    /// natural pixel dimensions.
    MapReady {
        natural_width: f64,
        natural_height: f64,
    },
    /// The current team confirms the pointer position, in display space.
    ConfirmGuess { point: Point },
    /// Close the round and show the target. `force` is the operator
    /// override that reveals before every team has guessed.
    RequestReveal { force: bool },
    NextRound,
}

/// Events emitted for the renderer to redraw from.
#[derive(Debug, Clone, Serialize)]
pub enum Output {
    RoundOpened {
        round: usize,
        map: MapResource,
        prompt: Option<String>,
        current_team: TeamId,
    },
    GuessConfirmed {
        team: TeamId,
        point: Point,
        next_team: TeamId,
    },
    AllGuessesIn {
        round: usize,
    },
    RoundRevealed {
        round: usize,
        target: Point,
        forced: bool,
        standings: Vec<Standing>,
        scoreboard: Vec<TeamScore>,
    },
    RoundLoading {
        round: usize,
        map: MapResource,
    },
    SessionComplete {
        final_standings: Vec<TeamScore>,
    },
}

/// One session: the round sequence, the turn rotation, the guess slots, and
/// the cumulative scoreboard.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    config: SessionConfig,
    phase: Phase,
    round_index: usize,
    mapper: Option<GeometryMapper>,
    target_display: Option<Point>,
    turn: TurnSequencer,
    guesses: GuessStore,
    board: ScoreBoard,
}

impl Session {
    /// Validate the configuration and start a session in `Loading` for
    /// round 0. The host must load the first map and feed `MapReady`.
    pub fn new(config: SessionConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let team_count = config.team_count;
        Ok(Session {
            id: Uuid::new_v4(),
            phase: Phase::Loading,
            round_index: 0,
            mapper: None,
            target_display: None,
            turn: TurnSequencer::new(team_count),
            guesses: GuessStore::new(team_count),
            board: ScoreBoard::new(team_count),
            config,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round_index(&self) -> usize {
        self.round_index
    }

    pub fn team_count(&self) -> u8 {
        self.config.team_count
    }

    pub fn current_round(&self) -> &RoundConfig {
        &self.config.rounds[self.round_index]
    }

    pub fn current_team(&self) -> TeamId {
        self.turn.current()
    }

    pub fn scoreboard(&self) -> Vec<TeamScore> {
        self.board.sorted_standings()
    }

    /// Single entry point: dispatch one input against the current phase.
    pub fn handle(&mut self, input: Input) -> Result<Vec<Output>, EngineError> {
        match (self.phase, input) {
            (Phase::SessionComplete, _) => Err(EngineError::NoActiveRound),
            (
                Phase::Loading,
                Input::MapReady {
                    natural_width,
                    natural_height,
                },
            ) => self.open_round(natural_width, natural_height),
            (Phase::Loading, Input::ConfirmGuess { .. } | Input::RequestReveal { .. }) => {
                Err(EngineError::MapNotReady)
            }
            (Phase::AwaitingGuesses | Phase::AllGuessesIn, Input::ConfirmGuess { point }) => {
                self.confirm_guess(point)
            }
            (Phase::AwaitingGuesses, Input::RequestReveal { force: false }) => {
                Err(EngineError::RoundNotComplete {
                    missing: self.guesses.missing(),
                })
            }
            (Phase::AwaitingGuesses, Input::RequestReveal { force: true }) => self.reveal(true),
            (Phase::AllGuessesIn, Input::RequestReveal { .. }) => self.reveal(false),
            (Phase::Revealed, Input::NextRound) => self.next_round(),
            _ => Err(EngineError::NoActiveRound),
        }
    }

    fn open_round(
        &mut self,
        natural_width: f64,
        natural_height: f64,
    ) -> Result<Vec<Output>, EngineError> {
        let round = &self.config.rounds[self.round_index];
        let mapper = GeometryMapper::new(
            natural_width,
            natural_height,
            self.config.viewport.width,
            self.config.viewport.height,
            round.coord_mode(),
        )?;
        let target = mapper.project_target(&round.target)?;
        let map = round.map.clone();
        let prompt = round.prompt.clone();

        self.turn.reset();
        self.guesses.reset();
        self.mapper = Some(mapper);
        self.target_display = Some(target);
        self.phase = Phase::AwaitingGuesses;
        Ok(vec![Output::RoundOpened {
            round: self.round_index,
            map,
            prompt,
            current_team: self.turn.current(),
        }])
    }

    fn confirm_guess(&mut self, point: Point) -> Result<Vec<Output>, EngineError> {
        let team = self.turn.current();
        self.guesses.record(team, point)?;
        let next_team = self.turn.advance();
        let mut outputs = vec![Output::GuessConfirmed {
            team,
            point,
            next_team,
        }];
        if self.guesses.is_complete() {
            self.phase = Phase::AllGuessesIn;
            outputs.push(Output::AllGuessesIn {
                round: self.round_index,
            });
        }
        Ok(outputs)
    }

    fn reveal(&mut self, forced: bool) -> Result<Vec<Output>, EngineError> {
        let mapper = self.mapper.as_ref().ok_or(EngineError::MapNotReady)?;
        let target = self.target_display.ok_or(EngineError::MapNotReady)?;

        let entries: Vec<(TeamId, Option<Point>)> = self.guesses.entries().collect();
        let mut standings = scoring::rank(&entries, target);
        if mapper.is_geo() {
            if let Ok(target_geo) = mapper.to_lat_lon(target) {
                for standing in &mut standings {
                    if let Some(guess) = self.guesses.get(standing.team) {
                        if let Ok(guess_geo) = mapper.to_lat_lon(guess) {
                            standing.geo_km = Some(haversine_km(guess_geo, target_geo));
                        }
                    }
                }
            }
        }

        self.board.apply(&standings);
        self.phase = Phase::Revealed;
        Ok(vec![Output::RoundRevealed {
            round: self.round_index,
            target,
            forced,
            standings,
            scoreboard: self.board.sorted_standings(),
        }])
    }

    fn next_round(&mut self) -> Result<Vec<Output>, EngineError> {
        let next = self.round_index + 1;
        if next >= self.config.rounds.len() && !self.config.cycle {
            self.phase = Phase::SessionComplete;
            self.mapper = None;
            self.target_display = None;
            return Ok(vec![Output::SessionComplete {
                final_standings: self.board.sorted_standings(),
            }]);
        }

        self.round_index = if next >= self.config.rounds.len() { 0 } else { next };
        self.turn.reset();
        self.guesses.reset();
        self.mapper = None;
        self.target_display = None;
        self.phase = Phase::Loading;
        Ok(vec![Output::RoundLoading {
            round: self.round_index,
            map: self.config.rounds[self.round_index].map.clone(),
        }])
    }
}
