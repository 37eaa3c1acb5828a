//! Fleets: ships in flight.

use crate::game::{Direction, PlayerId, Point, flight_plan};

/// Unique identifier of a fleet.
pub type FleetId = String;

/// Collection rate never exceeds this fraction of a cell's kore.
pub const MAX_COLLECTION_RATE: f64 = 0.99;

/// A group of ships moving across the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Fleet {
    /// Unique identifier.
    pub id: FleetId,
    /// Number of ships, always positive on a live fleet.
    pub ship_count: u32,
    /// Current heading.
    pub direction: Direction,
    /// Current cell.
    pub position: Point,
    /// Remaining route.
    pub flight_plan: String,
    /// Kore carried as cargo.
    pub kore: f64,
    /// Owning player.
    pub player_id: PlayerId,
}

impl Fleet {
    /// Create a new fleet.
    #[must_use]
    pub fn new(
        id: impl Into<FleetId>,
        ship_count: u32,
        direction: Direction,
        position: Point,
        kore: f64,
        flight_plan: impl Into<String>,
        player_id: PlayerId,
    ) -> Self {
        Self {
            id: id.into(),
            ship_count,
            direction,
            position,
            flight_plan: flight_plan.into(),
            kore,
            player_id,
        }
    }

    /// Fraction of a cell's kore this fleet mines per tick.
    ///
    /// `ln(ship_count) / 20`, capped at [`MAX_COLLECTION_RATE`].
    #[must_use]
    pub fn collection_rate(&self) -> f64 {
        if self.ship_count == 0 {
            return 0.0;
        }
        (f64::from(self.ship_count).ln() / 20.0).min(MAX_COLLECTION_RATE)
    }

    /// Longest plan this fleet may carry.
    #[must_use]
    pub fn max_flight_plan_len(&self) -> usize {
        flight_plan::max_flight_plan_len(self.ship_count)
    }

    /// Whether this fleet loses to `other` when two allied fleets merge.
    ///
    /// Fewer ships lose, then less kore, then the larger direction index,
    /// then the larger id.
    #[must_use]
    pub fn less_than_other_allied_fleet(&self, other: &Fleet) -> bool {
        if self.ship_count != other.ship_count {
            return self.ship_count < other.ship_count;
        }
        let kore = self.kore.total_cmp(&other.kore);
        if kore.is_ne() {
            return kore.is_lt();
        }
        if self.direction != other.direction {
            return self.direction.to_index() > other.direction.to_index();
        }
        self.id > other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet(id: &str, ships: u32, direction: Direction, kore: f64) -> Fleet {
        Fleet::new(id, ships, direction, Point::new(0, 0), kore, "", 0)
    }

    #[test]
    fn test_collection_rate_grows() {
        let one = fleet("a", 1, Direction::North, 0.0);
        let ten = fleet("b", 10, Direction::North, 0.0);
        let hundred = fleet("c", 100, Direction::North, 0.0);
        assert!(one.collection_rate().abs() < f64::EPSILON);
        assert!(ten.collection_rate() > one.collection_rate());
        assert!(hundred.collection_rate() > ten.collection_rate());
        assert!(hundred.collection_rate() <= MAX_COLLECTION_RATE);
    }

    #[test]
    fn test_less_than_by_ships() {
        let small = fleet("a", 10, Direction::North, 500.0);
        let large = fleet("b", 11, Direction::South, 0.0);
        assert!(small.less_than_other_allied_fleet(&large));
        assert!(!large.less_than_other_allied_fleet(&small));
    }

    #[test]
    fn test_less_than_by_kore() {
        let poor = fleet("a", 10, Direction::North, 100.0);
        let rich = fleet("b", 10, Direction::South, 101.0);
        assert!(poor.less_than_other_allied_fleet(&rich));
    }

    #[test]
    fn test_less_than_by_direction() {
        let north = fleet("a", 10, Direction::North, 100.0);
        let south = fleet("b", 10, Direction::South, 100.0);
        assert!(south.less_than_other_allied_fleet(&north));
        assert!(!north.less_than_other_allied_fleet(&south));
    }

    #[test]
    fn test_less_than_by_id() {
        let first = fleet("a", 10, Direction::East, 1.0);
        let second = fleet("b", 10, Direction::East, 1.0);
        assert!(second.less_than_other_allied_fleet(&first));
        assert!(!first.less_than_other_allied_fleet(&second));
    }
}
