//! Player state.

use crate::game::{FleetId, ShipyardId};

/// Index of a player in the board's player list.
pub type PlayerId = usize;

/// A competitor's balance and holdings.
///
/// Fleets and shipyards live on the board; the player only lists their ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Unique identifier.
    pub id: PlayerId,
    /// Kore balance.
    pub kore: f64,
    /// Owned fleets, in the order they were added.
    pub fleet_ids: Vec<FleetId>,
    /// Owned shipyards, in the order they were added.
    pub shipyard_ids: Vec<ShipyardId>,
}

impl Player {
    /// Create a player with no fleets or shipyards.
    #[must_use]
    pub const fn new(id: PlayerId, kore: f64) -> Self {
        Self {
            id,
            kore,
            fleet_ids: Vec::new(),
            shipyard_ids: Vec::new(),
        }
    }

    /// A player with neither fleets nor shipyards is out of the match.
    #[must_use]
    pub fn is_eliminated(&self) -> bool {
        self.fleet_ids.is_empty() && self.shipyard_ids.is_empty()
    }

    pub(crate) fn remove_fleet(&mut self, fleet_id: &str) {
        self.fleet_ids.retain(|id| id != fleet_id);
    }

    pub(crate) fn remove_shipyard(&mut self, shipyard_id: &str) {
        self.shipyard_ids.retain(|id| id != shipyard_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = Player::new(1, 500.0);
        assert_eq!(player.id, 1);
        assert!(player.is_eliminated());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut player = Player::new(0, 0.0);
        player.fleet_ids = vec!["a".into(), "b".into(), "c".into()];
        player.remove_fleet("b");
        assert_eq!(player.fleet_ids, vec!["a".to_string(), "c".to_string()]);
        assert!(!player.is_eliminated());

        player.shipyard_ids.push("s".into());
        player.remove_shipyard("s");
        assert!(player.shipyard_ids.is_empty());
    }
}
