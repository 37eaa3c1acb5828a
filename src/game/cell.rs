//! Board cells.

use crate::game::{FleetId, Point, ShipyardId};

/// One square of the board.
///
/// Occupants are referenced by id and resolved through the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Where the cell is.
    pub position: Point,
    /// Kore lying on the cell.
    pub kore: f64,
    /// Fleet on the cell, if any.
    pub fleet_id: Option<FleetId>,
    /// Shipyard on the cell, if any.
    pub shipyard_id: Option<ShipyardId>,
}

impl Cell {
    /// Create an unoccupied cell.
    #[must_use]
    pub const fn new(position: Point, kore: f64) -> Self {
        Self {
            position,
            kore,
            fleet_id: None,
            shipyard_id: None,
        }
    }

    /// Whether neither a fleet nor a shipyard is on the cell.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fleet_id.is_none() && self.shipyard_id.is_none()
    }
}
