//! The board: aggregate root owning every entity of a match tick.

use std::collections::BTreeMap;

use crate::error::{BoardError, BoardResult};
use crate::game::{
    Cell, Configuration, Fleet, FleetId, Player, PlayerId, Point, Shipyard, ShipyardAction,
    ShipyardId,
};

/// Actions a player had pending when a tick was resolved, in shipyard order.
pub type ActionLog = Vec<(ShipyardId, ShipyardAction)>;

/// Complete state of one match tick.
///
/// Entities reference each other only by id; the board owns them all in
/// ordered maps so that cloning is a plain deep copy and iteration order is
/// the same everywhere. External callers may only attach shipyard actions
/// (see [`Board::set_next_action`]) before calling [`Board::next`].
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub(super) configuration: Configuration,
    pub(super) step: u32,
    pub(super) remaining_overage_time: f64,
    pub(super) current_player_id: PlayerId,
    pub(super) players: Vec<Player>,
    pub(super) fleets: BTreeMap<FleetId, Fleet>,
    pub(super) shipyards: BTreeMap<ShipyardId, Shipyard>,
    pub(super) cells: Vec<Cell>,
    pub(super) previous_actions: Vec<ActionLog>,
    pub(super) uid_counter: u32,
}

impl Board {
    /// Create a board at step 0 with the given cell kore and `num_players`
    /// players holding `starting_kore` each, and no fleets or shipyards.
    ///
    /// `kore` is indexed by [`Point::to_index`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or `kore` does not
    /// cover the board.
    pub fn new(
        configuration: Configuration,
        kore: Vec<f64>,
        num_players: usize,
    ) -> BoardResult<Self> {
        configuration.validate()?;

        let expected = configuration.cell_count();
        if kore.len() != expected {
            return Err(BoardError::KoreLength {
                expected,
                actual: kore.len(),
            });
        }

        let size = configuration.size;
        let cells = kore
            .into_iter()
            .enumerate()
            .map(|(index, kore)| Cell::new(Point::from_index(index, size), kore))
            .collect();
        let players = (0..num_players)
            .map(|id| Player::new(id, configuration.starting_kore))
            .collect();

        Ok(Self {
            configuration,
            step: 0,
            remaining_overage_time: 0.0,
            current_player_id: 0,
            players,
            fleets: BTreeMap::new(),
            shipyards: BTreeMap::new(),
            cells,
            previous_actions: vec![Vec::new(); num_players],
            uid_counter: 0,
        })
    }

    /// Match parameters.
    #[must_use]
    pub const fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Current tick.
    #[must_use]
    pub const fn step(&self) -> u32 {
        self.step
    }

    /// Wall-clock budget left to the observing agent, carried through untouched.
    #[must_use]
    pub const fn remaining_overage_time(&self) -> f64 {
        self.remaining_overage_time
    }

    /// Id of the observing player.
    #[must_use]
    pub const fn current_player_id(&self) -> PlayerId {
        self.current_player_id
    }

    /// All players, indexed by id.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Look up a player.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownPlayer`] for an id not on the board.
    pub fn player(&self, player_id: PlayerId) -> BoardResult<&Player> {
        self.players
            .get(player_id)
            .ok_or(BoardError::UnknownPlayer(player_id))
    }

    /// The observing player.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownPlayer`] if the board has no such player.
    pub fn current_player(&self) -> BoardResult<&Player> {
        self.player(self.current_player_id)
    }

    /// Every player other than the observing one.
    pub fn opponents(&self) -> impl Iterator<Item = &Player> {
        self.players
            .iter()
            .filter(move |player| player.id != self.current_player_id)
    }

    /// All fleets in id order.
    pub fn fleets(&self) -> impl Iterator<Item = &Fleet> {
        self.fleets.values()
    }

    /// All shipyards in id order.
    pub fn shipyards(&self) -> impl Iterator<Item = &Shipyard> {
        self.shipyards.values()
    }

    /// Look up a fleet.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownFleet`] for an id not on the board.
    pub fn fleet(&self, fleet_id: &str) -> BoardResult<&Fleet> {
        self.fleets
            .get(fleet_id)
            .ok_or_else(|| BoardError::UnknownFleet(fleet_id.to_string()))
    }

    /// Look up a shipyard.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownShipyard`] for an id not on the board.
    pub fn shipyard(&self, shipyard_id: &str) -> BoardResult<&Shipyard> {
        self.shipyards
            .get(shipyard_id)
            .ok_or_else(|| BoardError::UnknownShipyard(shipyard_id.to_string()))
    }

    /// All cells in index order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cell at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::PositionOutOfRange`] if `position` is off the board.
    pub fn cell_at(&self, position: Point) -> BoardResult<&Cell> {
        let index = self.cell_index(position)?;
        Ok(&self.cells[index])
    }

    /// The fleet standing on `position`, if any.
    #[must_use]
    pub fn fleet_at(&self, position: Point) -> Option<&Fleet> {
        let cell = self.cell_at(position).ok()?;
        self.fleets.get(cell.fleet_id.as_deref()?)
    }

    /// The shipyard standing on `position`, if any.
    #[must_use]
    pub fn shipyard_at(&self, position: Point) -> Option<&Shipyard> {
        let cell = self.cell_at(position).ok()?;
        self.shipyards.get(cell.shipyard_id.as_deref()?)
    }

    /// Actions `player_id` had pending when the previous tick was resolved.
    ///
    /// Empty on a freshly built board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownPlayer`] for an id not on the board.
    pub fn previous_actions(
        &self,
        player_id: PlayerId,
    ) -> BoardResult<&[(ShipyardId, ShipyardAction)]> {
        self.previous_actions
            .get(player_id)
            .map(Vec::as_slice)
            .ok_or(BoardError::UnknownPlayer(player_id))
    }

    /// Whether the match is over: the last step has been reached, or too few
    /// players still own a fleet or shipyard to continue.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        if self.step + 1 >= self.configuration.episode_steps {
            return true;
        }
        let alive = self
            .players
            .iter()
            .filter(|player| !player.is_eliminated())
            .count();
        alive < self.players.len().min(2)
    }

    /// Attach `action` to a shipyard, replacing any pending one.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownShipyard`] for an id not on the board.
    pub fn set_next_action(
        &mut self,
        shipyard_id: &str,
        action: ShipyardAction,
    ) -> BoardResult<()> {
        let shipyard = self
            .shipyards
            .get_mut(shipyard_id)
            .ok_or_else(|| BoardError::UnknownShipyard(shipyard_id.to_string()))?;
        shipyard.set_next_action(action);
        Ok(())
    }

    /// Place a fleet on the board. Used while setting up a tick.
    ///
    /// # Errors
    ///
    /// Fails if the owner is unknown, the id is taken, the position is off
    /// the board, or another fleet already stands there.
    pub fn add_fleet(&mut self, fleet: Fleet) -> BoardResult<()> {
        if fleet.player_id >= self.players.len() {
            return Err(BoardError::UnknownPlayer(fleet.player_id));
        }
        if self.fleets.contains_key(&fleet.id) {
            return Err(BoardError::DuplicateFleet(fleet.id));
        }
        let index = self.cell_index(fleet.position)?;
        if let Some(occupant) = &self.cells[index].fleet_id {
            return Err(BoardError::CellOccupied {
                position: fleet.position,
                occupant: occupant.clone(),
            });
        }
        self.insert_fleet(fleet)
    }

    /// Register a fleet created while a tick is resolved.
    ///
    /// The new fleet takes over its cell's fleet reference even if another
    /// fleet still stands there; battles settle the cell later in the tick.
    pub(super) fn insert_fleet(&mut self, fleet: Fleet) -> BoardResult<()> {
        let index = self.cell_index(fleet.position)?;
        self.player_mut(fleet.player_id)?
            .fleet_ids
            .push(fleet.id.clone());
        self.cells[index].fleet_id = Some(fleet.id.clone());
        self.fleets.insert(fleet.id.clone(), fleet);
        Ok(())
    }

    /// Place a shipyard on the board, clearing its cell's kore.
    ///
    /// # Errors
    ///
    /// Fails if the owner is unknown, the id is taken, the position is off
    /// the board, or another shipyard already stands there.
    pub fn add_shipyard(&mut self, shipyard: Shipyard) -> BoardResult<()> {
        if shipyard.player_id >= self.players.len() {
            return Err(BoardError::UnknownPlayer(shipyard.player_id));
        }
        if self.shipyards.contains_key(&shipyard.id) {
            return Err(BoardError::DuplicateShipyard(shipyard.id));
        }
        let index = self.cell_index(shipyard.position)?;
        let cell = &mut self.cells[index];
        if let Some(occupant) = &cell.shipyard_id {
            return Err(BoardError::CellOccupied {
                position: shipyard.position,
                occupant: occupant.clone(),
            });
        }

        cell.shipyard_id = Some(shipyard.id.clone());
        cell.kore = 0.0;
        self.players[shipyard.player_id]
            .shipyard_ids
            .push(shipyard.id.clone());
        self.shipyards.insert(shipyard.id.clone(), shipyard);
        Ok(())
    }

    /// Remove a fleet and every reference to it.
    pub(super) fn delete_fleet(&mut self, fleet_id: &str) -> BoardResult<Fleet> {
        let fleet = self
            .fleets
            .remove(fleet_id)
            .ok_or_else(|| BoardError::UnknownFleet(fleet_id.to_string()))?;
        if let Some(player) = self.players.get_mut(fleet.player_id) {
            player.remove_fleet(fleet_id);
        }
        let index = self.cell_index(fleet.position)?;
        let cell = &mut self.cells[index];
        if cell.fleet_id.as_deref() == Some(fleet_id) {
            cell.fleet_id = None;
        }
        Ok(fleet)
    }

    /// Remove a shipyard and every reference to it.
    pub(super) fn delete_shipyard(&mut self, shipyard_id: &str) -> BoardResult<Shipyard> {
        let shipyard = self
            .shipyards
            .remove(shipyard_id)
            .ok_or_else(|| BoardError::UnknownShipyard(shipyard_id.to_string()))?;
        if let Some(player) = self.players.get_mut(shipyard.player_id) {
            player.remove_shipyard(shipyard_id);
        }
        let index = self.cell_index(shipyard.position)?;
        let cell = &mut self.cells[index];
        if cell.shipyard_id.as_deref() == Some(shipyard_id) {
            cell.shipyard_id = None;
        }
        Ok(shipyard)
    }

    pub(super) fn cell_index(&self, position: Point) -> BoardResult<usize> {
        let size = self.configuration.size;
        if !position.in_bounds(size) {
            return Err(BoardError::PositionOutOfRange { position, size });
        }
        Ok(position.to_index(size))
    }

    pub(super) fn fleet_mut(&mut self, fleet_id: &str) -> BoardResult<&mut Fleet> {
        self.fleets
            .get_mut(fleet_id)
            .ok_or_else(|| BoardError::UnknownFleet(fleet_id.to_string()))
    }

    pub(super) fn shipyard_mut(&mut self, shipyard_id: &str) -> BoardResult<&mut Shipyard> {
        self.shipyards
            .get_mut(shipyard_id)
            .ok_or_else(|| BoardError::UnknownShipyard(shipyard_id.to_string()))
    }

    pub(super) fn player_mut(&mut self, player_id: PlayerId) -> BoardResult<&mut Player> {
        self.players
            .get_mut(player_id)
            .ok_or(BoardError::UnknownPlayer(player_id))
    }

    /// Ids of a player's shipyards in id order.
    ///
    /// Tick resolution walks entities in this order rather than the player's
    /// insertion order, which an observation does not preserve.
    pub(super) fn owned_shipyard_ids(&self, player_id: PlayerId) -> Vec<ShipyardId> {
        self.shipyards
            .values()
            .filter(|shipyard| shipyard.player_id == player_id)
            .map(|shipyard| shipyard.id.clone())
            .collect()
    }

    /// Ids of a player's fleets in id order.
    pub(super) fn owned_fleet_ids(&self, player_id: PlayerId) -> Vec<FleetId> {
        self.fleets
            .values()
            .filter(|fleet| fleet.player_id == player_id)
            .map(|fleet| fleet.id.clone())
            .collect()
    }

    /// Next id for an entity created during the tick being resolved.
    pub(super) fn create_uid(&mut self) -> String {
        let uid = format!("{}-{}", self.step + 1, self.uid_counter);
        self.uid_counter += 1;
        uid
    }
}
