//! Game layer for Kore.
//!
//! Implements the rules of one match tick:
//! - Toroidal geometry and headings
//! - Fleets, shipyards, cells and players referenced by id
//! - Flight plans and shipyard actions
//! - The board and its per-tick transition
//! - Combat and the kore economy

mod action;
mod board;
mod cell;
mod combat;
mod config;
mod economy;
mod fleet;
pub mod flight_plan;
mod geometry;
pub mod invariants;
mod observation;
mod player;
mod shipyard;
mod turn;

pub use action::{ActionParseError, ShipyardAction};
pub use board::{ActionLog, Board};
pub use cell::Cell;
pub use combat::{CollisionOutcome, resolve_collision};
pub use config::Configuration;
pub use economy::round_kore;
pub use fleet::{Fleet, FleetId, MAX_COLLECTION_RATE};
pub use geometry::{Direction, Point};
pub use observation::{Observation, RawFleet, RawPlayer, RawShipyard};
pub use player::{Player, PlayerId};
pub use shipyard::{MAX_SPAWN_CAP, SPAWN_VALUES, Shipyard, ShipyardId};
