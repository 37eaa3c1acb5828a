//! Shipyard actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An order attached to a shipyard for the current tick.
///
/// Validity is only checked when the action is applied. Constructing an
/// action that cannot succeed is fine; it simply has no effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipyardAction {
    /// Buy `count` ships at the shipyard.
    Spawn {
        /// Ships to spawn.
        count: u32,
    },
    /// Send `count` ships out as a new fleet following `flight_plan`.
    Launch {
        /// Ships to launch.
        count: u32,
        /// Route for the new fleet.
        flight_plan: String,
    },
}

impl ShipyardAction {
    /// Spawn `count` ships.
    #[must_use]
    pub const fn spawn_ships(count: u32) -> Self {
        Self::Spawn { count }
    }

    /// Launch `count` ships with the given flight plan.
    #[must_use]
    pub fn launch_fleet_with_flight_plan(count: u32, flight_plan: impl Into<String>) -> Self {
        Self::Launch {
            count,
            flight_plan: flight_plan.into(),
        }
    }

    /// Number of ships the action concerns.
    #[must_use]
    pub const fn ship_count(&self) -> u32 {
        match self {
            Self::Spawn { count } | Self::Launch { count, .. } => *count,
        }
    }

    /// Zero-ship actions are dropped without effect.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.ship_count() == 0
    }
}

impl fmt::Display for ShipyardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn { count } => write!(f, "SPAWN_{count}"),
            Self::Launch { count, flight_plan } => write!(f, "LAUNCH_{count}_{flight_plan}"),
        }
    }
}

/// Malformed action text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionParseError {
    /// The text does not start with a known action name.
    #[error("unknown action type in {0:?}")]
    UnknownType(String),
    /// The ship count is missing or not a number.
    #[error("invalid ship count in {0:?}")]
    InvalidCount(String),
    /// A launch without a flight plan.
    #[error("launch without flight plan in {0:?}")]
    MissingFlightPlan(String),
}

impl FromStr for ShipyardAction {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '_');
        let kind = parts.next().unwrap_or_default();
        let count = parts
            .next()
            .and_then(|count| count.parse::<u32>().ok())
            .ok_or_else(|| ActionParseError::InvalidCount(s.to_string()));

        match kind {
            "SPAWN" => Ok(Self::Spawn { count: count? }),
            "LAUNCH" => {
                let count = count?;
                let flight_plan = parts
                    .next()
                    .ok_or_else(|| ActionParseError::MissingFlightPlan(s.to_string()))?;
                Ok(Self::Launch {
                    count,
                    flight_plan: flight_plan.to_string(),
                })
            }
            _ => Err(ActionParseError::UnknownType(s.to_string())),
        }
    }
}
