//! Match configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Immutable match parameters, decoded once and shared by every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    /// Side length of the square board.
    pub size: i32,
    /// Kore cost of spawning one ship.
    pub spawn_cost: f64,
    /// Ships consumed when a fleet converts into a shipyard.
    pub convert_cost: u32,
    /// Multiplicative kore regeneration per tick on empty cells.
    pub regen_rate: f64,
    /// Cells at or above this amount stop regenerating.
    pub max_regen_cell_kore: f64,
    /// Seconds an agent may take per tick. Enforced by the judge, not here.
    pub agent_timeout: f64,
    /// Seed for match setup.
    pub random_seed: u64,
    /// Kore each player starts with.
    pub starting_kore: f64,
    /// Length of a match in ticks.
    pub episode_steps: u32,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            size: 21,
            spawn_cost: 10.0,
            convert_cost: 50,
            regen_rate: 0.02,
            max_regen_cell_kore: 500.0,
            agent_timeout: 10.0,
            random_seed: 0,
            starting_kore: 500.0,
            episode_steps: 400,
        }
    }
}

impl Configuration {
    /// Number of cells on the board.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn cell_count(&self) -> usize {
        (self.size as usize) * (self.size as usize)
    }

    /// Check that the parameters describe a playable match.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size <= 0 {
            return Err(ConfigError::InvalidSize(self.size));
        }

        let fields = [
            ("spawnCost", self.spawn_cost),
            ("regenRate", self.regen_rate),
            ("maxRegenCellKore", self.max_regen_cell_kore),
            ("agentTimeout", self.agent_timeout),
            ("startingKore", self.starting_kore),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeValue { field, value });
            }
        }

        Ok(())
    }
}
