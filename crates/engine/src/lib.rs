//! Session, turn, and scoring engine for a party-style map-guessing game.
//!
//! Teams take turns dropping a marker on a map image; when every team has
//! guessed, the hidden target is revealed, guesses are ranked by on-screen
//! distance, and golf-style points (rank position, lowest wins) accumulate
//! across rounds. The engine is pure and synchronous: the hosting UI feeds
//! [`session::Input`] events into [`session::Session::handle`] and redraws
//! from the [`session::Output`] events it gets back.

pub mod config;
pub mod error;
pub mod geometry;
pub mod guesses;
pub mod models;
pub mod scoring;
pub mod session;
pub mod turn;
