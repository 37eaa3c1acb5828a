//! Kore economy: spawning, mining and regeneration.
//!
//! Every kore value written during a tick goes through [`round_kore`], which
//! keeps balances on a fixed three-decimal grid so that independent engines
//! stay bit-identical.

use tracing::trace;

use crate::error::BoardResult;
use crate::game::{Board, MAX_COLLECTION_RATE, PlayerId};

/// Round a kore amount to three decimal places.
#[must_use]
pub fn round_kore(kore: f64) -> f64 {
    (kore * 1000.0).round() / 1000.0
}

impl Board {
    /// Buy `count` ships at a shipyard if the owner can afford them and the
    /// shipyard's spawn cap allows it. Returns whether the ships were added.
    pub(super) fn spawn_ships(
        &mut self,
        player_id: PlayerId,
        shipyard_id: &str,
        count: u32,
    ) -> BoardResult<bool> {
        let cost = self.configuration.spawn_cost * f64::from(count);
        let balance = self.player(player_id)?.kore;
        let shipyard = self.shipyard_mut(shipyard_id)?;

        if balance < cost || count > shipyard.max_spawn() {
            trace!(shipyard = shipyard_id, count, balance, "spawn rejected");
            return Ok(false);
        }

        shipyard.ship_count = shipyard.ship_count.saturating_add(count);
        let player = self.player_mut(player_id)?;
        player.kore = round_kore(player.kore - cost);
        Ok(true)
    }

    /// Each fleet mines a share of its cell's kore.
    pub(super) fn collect_kore(&mut self) {
        let size = self.configuration.size;
        for fleet in self.fleets.values_mut() {
            let cell = &mut self.cells[fleet.position.to_index(size)];
            let rate = fleet.collection_rate().min(MAX_COLLECTION_RATE);
            let delta = round_kore(cell.kore * rate);
            if delta > 0.0 {
                fleet.kore = round_kore(fleet.kore + delta);
                cell.kore = round_kore(cell.kore - delta);
            }
        }
    }

    /// Unoccupied cells below the cap grow by the regeneration rate.
    pub(super) fn regenerate_kore(&mut self) {
        let growth = 1.0 + self.configuration.regen_rate;
        let cap = self.configuration.max_regen_cell_kore;
        for cell in self.cells.iter_mut().filter(|cell| cell.is_empty()) {
            if cell.kore < cap {
                cell.kore = round_kore(cell.kore * growth);
            }
        }
    }
}
