//! Decoded per-tick observations and conversion to and from [`Board`].
//!
//! The layout mirrors the agent-facing JSON: each player is a
//! `[kore, shipyards, fleets]` triple, shipyards are `[position index, ship
//! count, turns controlled]` and fleets are `[position index, kore, ship
//! count, direction index, flight plan]`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, BoardResult};
use crate::game::{
    Board, Configuration, Direction, Fleet, FleetId, PlayerId, Point, Shipyard, ShipyardId,
};

/// A shipyard as `[position index, ship count, turns controlled]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawShipyard(pub usize, pub u32, pub u32);

/// A fleet as `[position index, kore, ship count, direction index, flight plan]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFleet(pub usize, pub f64, pub u32, pub u8, pub String);

/// A player as `[kore, shipyards by id, fleets by id]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawPlayer(
    pub f64,
    pub BTreeMap<ShipyardId, RawShipyard>,
    pub BTreeMap<FleetId, RawFleet>,
);

/// One tick of raw match state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Observation {
    /// Kore on every cell, indexed by [`Point::to_index`].
    pub kore: Vec<f64>,
    /// Per-player state, indexed by player id.
    pub players: Vec<RawPlayer>,
    /// The observing player.
    pub player: PlayerId,
    /// Current tick.
    pub step: u32,
    /// Wall-clock budget left to the observing agent.
    pub remaining_overage_time: f64,
}

impl Board {
    /// Build a board from a decoded observation.
    ///
    /// Fleets are placed before shipyards, and placing a shipyard clears its
    /// cell's kore.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration, a kore array that does not cover
    /// the board, an out-of-range position or direction index, an unknown
    /// observing player, or entities that collide on ids or cells.
    pub fn from_observation(
        observation: &Observation,
        configuration: Configuration,
    ) -> BoardResult<Self> {
        let mut board = Board::new(
            configuration,
            observation.kore.clone(),
            observation.players.len(),
        )?;
        if observation.player >= observation.players.len() {
            return Err(BoardError::UnknownPlayer(observation.player));
        }
        board.current_player_id = observation.player;
        board.step = observation.step;
        board.remaining_overage_time = observation.remaining_overage_time;

        let size = configuration.size;
        let cells = configuration.cell_count();
        let position_of = |index: usize| {
            if index < cells {
                Ok(Point::from_index(index, size))
            } else {
                Err(BoardError::IndexOutOfRange { index, cells })
            }
        };

        for (player_id, RawPlayer(kore, shipyards, fleets)) in
            observation.players.iter().enumerate()
        {
            board.players[player_id].kore = *kore;

            for (id, RawFleet(index, kore, ship_count, direction, plan)) in fleets {
                let direction = Direction::from_index(*direction)
                    .ok_or(BoardError::InvalidDirection(*direction))?;
                board.add_fleet(Fleet::new(
                    id.clone(),
                    *ship_count,
                    direction,
                    position_of(*index)?,
                    *kore,
                    plan.clone(),
                    player_id,
                ))?;
            }

            for (id, RawShipyard(index, ship_count, turns_controlled)) in shipyards {
                board.add_shipyard(Shipyard::new(
                    id.clone(),
                    *ship_count,
                    position_of(*index)?,
                    player_id,
                    *turns_controlled,
                ))?;
            }
        }

        Ok(board)
    }

    /// Decode this board back into raw primitives.
    ///
    /// Pending shipyard actions are not part of an observation and are lost.
    #[must_use]
    pub fn to_observation(&self) -> Observation {
        let size = self.configuration.size;
        let players = self
            .players
            .iter()
            .map(|player| {
                let shipyards = player
                    .shipyard_ids
                    .iter()
                    .filter_map(|id| self.shipyards.get(id))
                    .map(|s| {
                        let raw = RawShipyard(
                            s.position.to_index(size),
                            s.ship_count,
                            s.turns_controlled,
                        );
                        (s.id.clone(), raw)
                    })
                    .collect();
                let fleets = player
                    .fleet_ids
                    .iter()
                    .filter_map(|id| self.fleets.get(id))
                    .map(|f| {
                        let raw = RawFleet(
                            f.position.to_index(size),
                            f.kore,
                            f.ship_count,
                            f.direction.to_index(),
                            f.flight_plan.clone(),
                        );
                        (f.id.clone(), raw)
                    })
                    .collect();
                RawPlayer(player.kore, shipyards, fleets)
            })
            .collect();

        Observation {
            kore: self.cells.iter().map(|cell| cell.kore).collect(),
            players,
            player: self.current_player_id,
            step: self.step,
            remaining_overage_time: self.remaining_overage_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Configuration {
        Configuration {
            size: 5,
            ..Configuration::default()
        }
    }

    fn observation() -> Observation {
        let mut shipyards = BTreeMap::new();
        shipyards.insert("0-1".to_string(), RawShipyard(12, 4, 7));
        let mut fleets = BTreeMap::new();
        fleets.insert("0-2".to_string(), RawFleet(0, 3.5, 9, 2, "3N".to_string()));
        Observation {
            kore: vec![10.0; 25],
            players: vec![RawPlayer(250.0, shipyards, fleets), RawPlayer::default()],
            player: 1,
            step: 4,
            remaining_overage_time: 60.0,
        }
    }

    #[test]
    fn test_from_observation() {
        let board = Board::from_observation(&observation(), config()).unwrap();
        assert_eq!(board.step(), 4);
        assert_eq!(board.current_player_id(), 1);
        assert_eq!(board.opponents().next().unwrap().id, 0);

        let shipyard = board.shipyard("0-1").unwrap();
        assert_eq!(shipyard.position, Point::new(2, 2));
        assert_eq!(shipyard.turns_controlled, 7);
        assert!(board.cell_at(Point::new(2, 2)).unwrap().kore.abs() < f64::EPSILON);

        let fleet = board.fleet("0-2").unwrap();
        assert_eq!(fleet.position, Point::new(0, 4));
        assert_eq!(fleet.direction, Direction::South);
        assert_eq!(board.fleet_at(Point::new(0, 4)).unwrap().id, "0-2");
        assert!((board.players()[0].kore - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_observation_roundtrip() {
        let board = Board::from_observation(&observation(), config()).unwrap();
        let raw = board.to_observation();
        assert_eq!(raw.players, observation().players);
        assert_eq!(Board::from_observation(&raw, config()).unwrap(), board);
    }

    #[test]
    fn test_json_layout() {
        let json = serde_json::to_value(observation()).unwrap();
        assert_eq!(json["players"][0][1]["0-1"], serde_json::json!([12, 4, 7]));
        assert_eq!(
            json["players"][0][2]["0-2"],
            serde_json::json!([0, 3.5, 9, 2, "3N"])
        );
        assert_eq!(json["remainingOverageTime"], serde_json::json!(60.0));
    }

    #[test]
    fn test_rejects_bad_primitives() {
        let mut bad = observation();
        bad.players[0].2.insert("x".to_string(), RawFleet(99, 0.0, 1, 0, String::new()));
        assert_eq!(
            Board::from_observation(&bad, config()),
            Err(BoardError::IndexOutOfRange { index: 99, cells: 25 })
        );

        let mut bad = observation();
        bad.players[0].2.insert("x".to_string(), RawFleet(1, 0.0, 1, 9, String::new()));
        assert_eq!(
            Board::from_observation(&bad, config()),
            Err(BoardError::InvalidDirection(9))
        );

        let mut bad = observation();
        bad.player = 5;
        assert_eq!(
            Board::from_observation(&bad, config()),
            Err(BoardError::UnknownPlayer(5))
        );
    }
}
