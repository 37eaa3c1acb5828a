//! Shipyards and their spawn schedule.

use crate::game::{PlayerId, Point, ShipyardAction};

/// Unique identifier of a shipyard.
pub type ShipyardId = String;

/// Turns of continuous control after which the spawn cap steps up.
///
/// Cumulative sums of `i * i + 1` for `i = 1..=9`.
pub const SPAWN_VALUES: [u32; 9] = spawn_values();

/// Spawn cap once every threshold has been passed.
pub const MAX_SPAWN_CAP: u32 = SPAWN_VALUES.len() as u32 + 1;

const fn spawn_values() -> [u32; 9] {
    let mut values = [0; 9];
    let mut total = 0;
    let mut i = 0;
    while i < values.len() {
        let step = (i as u32) + 1;
        total += step * step + 1;
        values[i] = total;
        i += 1;
    }
    values
}

/// A stationary base that spawns, launches and receives ships.
#[derive(Debug, Clone, PartialEq)]
pub struct Shipyard {
    /// Unique identifier.
    pub id: ShipyardId,
    /// Ships docked here.
    pub ship_count: u32,
    /// Cell the shipyard occupies.
    pub position: Point,
    /// Owning player.
    pub player_id: PlayerId,
    /// Ticks under the current owner.
    pub turns_controlled: u32,
    /// Order for the current tick.
    pub next_action: Option<ShipyardAction>,
}

impl Shipyard {
    /// Create a new shipyard with no pending action.
    #[must_use]
    pub fn new(
        id: impl Into<ShipyardId>,
        ship_count: u32,
        position: Point,
        player_id: PlayerId,
        turns_controlled: u32,
    ) -> Self {
        Self {
            id: id.into(),
            ship_count,
            position,
            player_id,
            turns_controlled,
            next_action: None,
        }
    }

    /// Most ships this shipyard may spawn in one tick.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn max_spawn(&self) -> u32 {
        SPAWN_VALUES
            .iter()
            .position(|&threshold| self.turns_controlled < threshold)
            .map_or(MAX_SPAWN_CAP, |idx| idx as u32 + 1)
    }

    /// Replace the pending action.
    pub fn set_next_action(&mut self, action: ShipyardAction) {
        self.next_action = Some(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipyard(turns: u32) -> Shipyard {
        Shipyard::new("s", 0, Point::new(0, 0), 0, turns)
    }

    #[test]
    fn test_spawn_values() {
        assert_eq!(SPAWN_VALUES, [2, 7, 17, 34, 60, 97, 147, 212, 294]);
        assert_eq!(MAX_SPAWN_CAP, 10);
    }

    #[test]
    fn test_max_spawn_schedule() {
        assert_eq!(shipyard(0).max_spawn(), 1);
        assert_eq!(shipyard(1).max_spawn(), 1);
        assert_eq!(shipyard(2).max_spawn(), 2);
        assert_eq!(shipyard(6).max_spawn(), 2);
        assert_eq!(shipyard(7).max_spawn(), 3);
        assert_eq!(shipyard(293).max_spawn(), 9);
        assert_eq!(shipyard(294).max_spawn(), 10);
        assert_eq!(shipyard(10_000).max_spawn(), 10);
    }

    #[test]
    fn test_max_spawn_monotone() {
        let mut previous = 0;
        for turns in 0..400 {
            let cap = shipyard(turns).max_spawn();
            assert!(cap >= previous);
            previous = cap;
        }
    }

    #[test]
    fn test_set_next_action_replaces() {
        let mut yard = shipyard(0);
        yard.set_next_action(ShipyardAction::spawn_ships(1));
        yard.set_next_action(ShipyardAction::spawn_ships(2));
        assert_eq!(yard.next_action, Some(ShipyardAction::spawn_ships(2)));
    }
}
