//! The per-tick transition.

use tracing::{debug, trace};

use crate::error::BoardResult;
use crate::game::{
    Board, Direction, Fleet, PlayerId, Shipyard, ShipyardAction, flight_plan, round_kore,
};

impl Board {
    /// Resolve one tick and return the resulting board.
    ///
    /// The receiver is left untouched, so the same board may be stepped any
    /// number of times with identical results. Phases run in a fixed order:
    ///
    /// 1. shipyard actions, fleet movement and same-owner merging, player by
    ///    player
    /// 2. fleet battles
    /// 3. fleets against enemy shipyards
    /// 4. fleets docking at their own shipyards
    /// 5. damage from adjacent enemy fleets
    /// 6. kore collection and regeneration
    ///
    /// # Errors
    ///
    /// Only fails if the board's own bookkeeping is inconsistent, which
    /// points to corrupted input rather than an illegal move.
    pub fn next(&self) -> BoardResult<Board> {
        let mut board = self.clone();
        board.uid_counter = 0;
        board.previous_actions = vec![Vec::new(); board.players.len()];

        for player_id in 0..board.players.len() {
            board.apply_shipyard_actions(player_id)?;
            board.move_fleets(player_id)?;
            board.coalesce_fleets(player_id)?;
        }

        board.resolve_fleet_collisions()?;
        board.resolve_shipyard_collisions()?;
        board.dock_allied_fleets()?;
        board.apply_adjacent_damage()?;
        board.collect_kore();
        board.regenerate_kore();

        board.step += 1;
        trace!(
            step = board.step,
            fleets = board.fleets.len(),
            shipyards = board.shipyards.len(),
            "tick resolved"
        );
        Ok(board)
    }

    /// Apply every pending shipyard action of one player, then clear the
    /// actions and age the player's shipyards by one tick.
    fn apply_shipyard_actions(&mut self, player_id: PlayerId) -> BoardResult<()> {
        self.player(player_id)?;
        let shipyard_ids = self.owned_shipyard_ids(player_id);

        for shipyard_id in &shipyard_ids {
            let Some(action) = self.shipyard_mut(shipyard_id)?.next_action.take() else {
                continue;
            };
            self.previous_actions[player_id].push((shipyard_id.clone(), action.clone()));
            if action.is_noop() {
                continue;
            }

            match action {
                ShipyardAction::Spawn { count } => {
                    self.spawn_ships(player_id, shipyard_id, count)?;
                }
                ShipyardAction::Launch { count, flight_plan } => {
                    self.launch_fleet(player_id, shipyard_id, count, &flight_plan)?;
                }
            }
        }

        for shipyard_id in &shipyard_ids {
            let shipyard = self.shipyard_mut(shipyard_id)?;
            shipyard.next_action = None;
            shipyard.turns_controlled += 1;
        }
        Ok(())
    }

    /// Send `count` ships out of a shipyard as a new fleet.
    ///
    /// Dropped without effect if the shipyard is short of ships or the plan
    /// is empty, contains a character outside the plan alphabet, or does not
    /// open with a heading.
    fn launch_fleet(
        &mut self,
        player_id: PlayerId,
        shipyard_id: &str,
        count: u32,
        plan: &str,
    ) -> BoardResult<()> {
        let shipyard = self.shipyard_mut(shipyard_id)?;
        if shipyard.ship_count < count || !flight_plan::is_valid(plan) {
            trace!(shipyard = shipyard_id, count, plan, "launch rejected");
            return Ok(());
        }
        let Some(direction) = plan.chars().next().and_then(Direction::from_char) else {
            trace!(shipyard = shipyard_id, count, plan, "launch rejected");
            return Ok(());
        };

        shipyard.ship_count -= count;
        let position = shipyard.position;
        let id = self.create_uid();
        let plan = flight_plan::truncate(plan, count);
        debug!(shipyard = shipyard_id, fleet = %id, count, plan, "fleet launched");
        self.insert_fleet(Fleet::new(id, count, direction, position, 0.0, plan, player_id))
    }

    /// Advance every fleet of one player by one token of its plan and one
    /// cell along its heading.
    ///
    /// Moved fleets are not yet recorded on their destination cell; battles
    /// decide who ends up there.
    fn move_fleets(&mut self, player_id: PlayerId) -> BoardResult<()> {
        let size = self.configuration.size;
        let convert_cost = self.configuration.convert_cost;
        self.player(player_id)?;
        let fleet_ids = self.owned_fleet_ids(player_id);

        for fleet_id in &fleet_ids {
            let fleet = self.fleet_mut(fleet_id)?;
            fleet.flight_plan = flight_plan::strip_leading_zeros(&fleet.flight_plan).to_string();

            if flight_plan::starts_with_convert(&fleet.flight_plan) {
                let (ship_count, position) = (fleet.ship_count, fleet.position);
                let cell_has_shipyard = self.cell_at(position)?.shipyard_id.is_some();
                if ship_count >= convert_cost && !cell_has_shipyard {
                    self.convert_fleet(fleet_id)?;
                    continue;
                }
                let fleet = self.fleet_mut(fleet_id)?;
                fleet.flight_plan.remove(0);
            }

            let fleet = self.fleet_mut(fleet_id)?;
            let (heading, rest) = flight_plan::advance(&fleet.flight_plan);
            if let Some(direction) = heading {
                fleet.direction = direction;
            }
            fleet.flight_plan = rest;

            let from = fleet.position;
            fleet.position = from.translate(fleet.direction.to_point(), size);
            let index = self.cell_index(from)?;
            let cell = &mut self.cells[index];
            if cell.fleet_id.as_deref() == Some(fleet_id.as_str()) {
                cell.fleet_id = None;
            }
        }
        Ok(())
    }

    /// Turn a fleet into a shipyard on its current cell.
    ///
    /// The fleet's cargo goes to its owner and the conversion cost is paid
    /// in ships.
    fn convert_fleet(&mut self, fleet_id: &str) -> BoardResult<()> {
        let fleet = self.delete_fleet(fleet_id)?;
        let player = self.player_mut(fleet.player_id)?;
        player.kore = round_kore(player.kore + fleet.kore);

        let id = self.create_uid();
        let ship_count = fleet.ship_count - self.configuration.convert_cost;
        debug!(fleet = fleet_id, shipyard = %id, position = %fleet.position, "fleet converted");
        self.add_shipyard(Shipyard::new(id, ship_count, fleet.position, fleet.player_id, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Configuration, Point};

    fn board() -> Board {
        let config = Configuration {
            size: 7,
            ..Configuration::default()
        };
        let mut board = Board::new(config, vec![1.0; 49], 2).unwrap();
        board
            .add_shipyard(Shipyard::new("0-1", 20, Point::new(3, 3), 0, 0))
            .unwrap();
        board
    }

    #[test]
    fn test_next_leaves_receiver_untouched() {
        let mut board = board();
        board
            .set_next_action("0-1", ShipyardAction::launch_fleet_with_flight_plan(5, "E"))
            .unwrap();
        let snapshot = board.clone();
        let next = board.next().unwrap();
        assert_eq!(board, snapshot);
        assert_eq!(next.step(), 1);
        assert_eq!(next, board.next().unwrap());
    }

    #[test]
    fn test_launch_moves_immediately() {
        let mut board = board();
        board
            .set_next_action("0-1", ShipyardAction::launch_fleet_with_flight_plan(5, "E"))
            .unwrap();
        let next = board.next().unwrap();

        let fleet = next.fleet("1-0").unwrap();
        assert_eq!(fleet.position, Point::new(4, 3));
        assert_eq!(fleet.direction, Direction::East);
        assert_eq!(fleet.flight_plan, "");
        assert_eq!(next.shipyard("0-1").unwrap().ship_count, 15);
        assert_eq!(next.fleet_at(Point::new(4, 3)).unwrap().id, "1-0");
    }

    #[test]
    fn test_invalid_launch_is_dropped() {
        for plan in ["", "N?", "C", "3N"] {
            let mut board = board();
            board
                .set_next_action("0-1", ShipyardAction::launch_fleet_with_flight_plan(5, plan))
                .unwrap();
            let next = board.next().unwrap();
            assert_eq!(next.fleets().count(), 0, "plan {plan:?} launched");
            assert_eq!(next.shipyard("0-1").unwrap().ship_count, 20);
        }
    }

    #[test]
    fn test_launch_needs_ships() {
        let mut board = board();
        board
            .set_next_action("0-1", ShipyardAction::launch_fleet_with_flight_plan(21, "N"))
            .unwrap();
        let next = board.next().unwrap();
        assert_eq!(next.fleets().count(), 0);
    }

    #[test]
    fn test_actions_are_logged_and_cleared() {
        let mut board = board();
        let action = ShipyardAction::spawn_ships(0);
        board.set_next_action("0-1", action.clone()).unwrap();
        let next = board.next().unwrap();

        assert_eq!(
            next.previous_actions(0).unwrap(),
            &[("0-1".to_string(), action)]
        );
        let shipyard = next.shipyard("0-1").unwrap();
        assert_eq!(shipyard.next_action, None);
        assert_eq!(shipyard.turns_controlled, 1);
        assert_eq!(shipyard.ship_count, 20);
    }

    #[test]
    fn test_failed_convert_continues_plan() {
        let mut board = board();
        board
            .add_fleet(Fleet::new("f", 10, Direction::North, Point::new(0, 0), 0.0, "CE", 1))
            .unwrap();
        let next = board.next().unwrap();
        let fleet = next.fleet("f").unwrap();
        assert_eq!(fleet.direction, Direction::East);
        assert_eq!(fleet.position, Point::new(1, 0));
        assert_eq!(fleet.flight_plan, "");
    }

    #[test]
    fn test_convert_pays_cost() {
        let mut board = board();
        board
            .add_fleet(Fleet::new("f", 60, Direction::North, Point::new(0, 0), 25.0, "C", 1))
            .unwrap();
        let next = board.next().unwrap();

        assert!(next.fleet("f").is_err());
        let shipyard = next.shipyard_at(Point::new(0, 0)).unwrap();
        assert_eq!(shipyard.ship_count, 10);
        assert_eq!(shipyard.player_id, 1);
        assert_eq!(shipyard.turns_controlled, 0);
        assert!((next.players()[1].kore - 525.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_padding_is_stripped() {
        let mut board = board();
        board
            .add_fleet(Fleet::new("f", 10, Direction::North, Point::new(0, 0), 0.0, "00W", 1))
            .unwrap();
        let next = board.next().unwrap();
        assert_eq!(next.fleet("f").unwrap().direction, Direction::West);
        assert_eq!(next.fleet("f").unwrap().position, Point::new(6, 0));
    }
}
