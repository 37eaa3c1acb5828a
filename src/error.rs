//! Error types for board construction and lookup.
//!
//! Gameplay itself never fails: illegal or unaffordable actions are silently
//! ignored. These errors signal corrupted input or broken bookkeeping.

use thiserror::Error;

use crate::game::{FleetId, PlayerId, Point, ShipyardId};

/// Fatal board errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    /// A position outside the board was used for a cell lookup.
    #[error("position {position} is outside the {size}x{size} board")]
    PositionOutOfRange {
        /// The offending position.
        position: Point,
        /// Board side length.
        size: i32,
    },
    /// A flat cell index outside the board.
    #[error("cell index {index} is outside a board of {cells} cells")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of cells on the board.
        cells: usize,
    },
    /// A fleet id that is not on the board.
    #[error("unknown fleet {0}")]
    UnknownFleet(FleetId),
    /// A shipyard id that is not on the board.
    #[error("unknown shipyard {0}")]
    UnknownShipyard(ShipyardId),
    /// A player id that is not on the board.
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    /// A fleet id that is already in use.
    #[error("duplicate fleet {0}")]
    DuplicateFleet(FleetId),
    /// A shipyard id that is already in use.
    #[error("duplicate shipyard {0}")]
    DuplicateShipyard(ShipyardId),
    /// Two entities of the same kind on one cell.
    #[error("cell {position} is already occupied by {occupant}")]
    CellOccupied {
        /// The contested cell.
        position: Point,
        /// Id of the entity already there.
        occupant: String,
    },
    /// A direction index outside `0..4`.
    #[error("invalid direction index {0}")]
    InvalidDirection(u8),
    /// The kore array does not cover the board.
    #[error("kore array has {actual} cells, expected {expected}")]
    KoreLength {
        /// Cells implied by the configuration.
        expected: usize,
        /// Cells provided.
        actual: usize,
    },
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Invalid match configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Board side length must be positive.
    #[error("board size must be positive, got {0}")]
    InvalidSize(i32),
    /// Costs and rates must be finite and non-negative.
    #[error("{field} must be finite and non-negative, got {value}")]
    NegativeValue {
        /// Configuration field name.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Result alias for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_display() {
        let err = BoardError::PositionOutOfRange {
            position: Point::new(25, 3),
            size: 21,
        };
        assert_eq!(err.to_string(), "position (25, 3) is outside the 21x21 board");
        assert_eq!(
            BoardError::UnknownFleet("3-1".to_string()).to_string(),
            "unknown fleet 3-1"
        );
    }

    #[test]
    fn test_config_error_converts() {
        let err: BoardError = ConfigError::InvalidSize(0).into();
        assert!(err.to_string().contains("must be positive"));
    }
}
