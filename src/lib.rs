// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Kore: a deterministic turn engine for the Kore fleets grid game.
//!
//! Players command stationary shipyards and mobile fleets on a wrap-around
//! grid, mining kore from cells that slowly regenerate. This crate provides:
//! - Bit-exact tick resolution ([`Board::next`])
//! - Bootstrapping boards from decoded observations
//! - Deterministic match setup
//! - Recording, replay and parallel verification of matches
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Replay / verification (rayon)     │
//! ├─────────────────────────────────────┤
//! │   Observations and match setup      │
//! ├─────────────────────────────────────┤
//! │   Board and tick transition         │
//! └─────────────────────────────────────┘
//! ```

pub mod error;
pub mod game;
pub mod mapgen;
pub mod replay;

pub use error::{BoardError, BoardResult, ConfigError};

// Re-export key game types at crate root for convenience
pub use game::{
    Board, Cell, Configuration, Direction, Fleet, FleetId, Observation, Player, PlayerId, Point,
    Shipyard, ShipyardAction, ShipyardId,
};
