//! Fleet merging and combat resolution.
//!
//! Fleet battles use a subtraction model: the strictly largest fleet on a
//! cell wins and loses as many ships as its largest opponent had. A tie for
//! largest destroys every fleet involved.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::BoardResult;
use crate::game::{Board, Direction, Fleet, FleetId, PlayerId, Shipyard, round_kore};

/// Outcome of a fleet battle on one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// One fleet survives.
    Winner {
        /// The surviving fleet.
        winner: FleetId,
        /// Every other fleet on the cell.
        losers: Vec<FleetId>,
        /// Ship count of the largest defeated fleet.
        losses: u32,
    },
    /// Two or more fleets tied for most ships; nobody survives.
    Stalemate(Vec<FleetId>),
}

/// Decide a battle between `fleets` sharing a cell.
///
/// A single fleet is trivially the winner with no losses.
#[must_use]
pub fn resolve_collision(fleets: &[&Fleet]) -> CollisionOutcome {
    let most_ships = fleets.iter().map(|f| f.ship_count).max().unwrap_or(0);
    let mut largest = fleets.iter().filter(|f| f.ship_count == most_ships);

    match (largest.next(), largest.next()) {
        (Some(winner), None) => {
            let losers: Vec<FleetId> = fleets
                .iter()
                .filter(|f| f.id != winner.id)
                .map(|f| f.id.clone())
                .collect();
            let losses = fleets
                .iter()
                .filter(|f| f.id != winner.id)
                .map(|f| f.ship_count)
                .max()
                .unwrap_or(0);
            CollisionOutcome::Winner {
                winner: winner.id.clone(),
                losers,
                losses,
            }
        }
        _ => CollisionOutcome::Stalemate(fleets.iter().map(|f| f.id.clone()).collect()),
    }
}

impl Board {
    /// Fleet ids grouped by the cell index they stand on, in id order.
    fn fleets_by_cell<'a>(
        &self,
        fleets: impl Iterator<Item = &'a Fleet>,
    ) -> BTreeMap<usize, Vec<FleetId>> {
        let size = self.configuration.size;
        let mut groups: BTreeMap<usize, Vec<FleetId>> = BTreeMap::new();
        for fleet in fleets {
            groups
                .entry(fleet.position.to_index(size))
                .or_default()
                .push(fleet.id.clone());
        }
        groups
    }

    /// Merge each player's fleets that ended on the same cell into one.
    ///
    /// The survivor keeps its id, heading and plan; ships and kore are summed.
    pub(super) fn coalesce_fleets(&mut self, player_id: PlayerId) -> BoardResult<()> {
        let owned = self.player(player_id)?.fleet_ids.clone();
        let fleets = owned
            .iter()
            .map(|id| self.fleet(id))
            .collect::<BoardResult<Vec<_>>>()?;
        let groups = self.fleets_by_cell(fleets.into_iter());

        for ids in groups.into_values().filter(|ids| ids.len() > 1) {
            let mut survivor = self.fleet(&ids[0])?;
            for id in &ids[1..] {
                let candidate = self.fleet(id)?;
                if survivor.less_than_other_allied_fleet(candidate) {
                    survivor = candidate;
                }
            }
            let survivor_id = survivor.id.clone();

            for id in ids.iter().filter(|id| **id != survivor_id) {
                let absorbed = self.delete_fleet(id)?;
                let survivor = self.fleet_mut(&survivor_id)?;
                survivor.ship_count = survivor.ship_count.saturating_add(absorbed.ship_count);
                survivor.kore = round_kore(survivor.kore + absorbed.kore);
                debug!(survivor = %survivor_id, absorbed = %absorbed.id, "fleets merged");
            }
        }
        Ok(())
    }

    /// Resolve battles between fleets of different players sharing a cell,
    /// and record the surviving fleet on each cell.
    pub(super) fn resolve_fleet_collisions(&mut self) -> BoardResult<()> {
        let groups = self.fleets_by_cell(self.fleets.values());

        for (index, ids) in groups {
            let fleets = ids
                .iter()
                .map(|id| self.fleet(id))
                .collect::<BoardResult<Vec<_>>>()?;

            match resolve_collision(&fleets) {
                CollisionOutcome::Winner {
                    winner,
                    losers,
                    losses,
                } => {
                    let mut plunder = 0.0;
                    for id in &losers {
                        plunder += self.delete_fleet(id)?.kore;
                    }
                    let fleet = self.fleet_mut(&winner)?;
                    fleet.ship_count -= losses;
                    fleet.kore = round_kore(fleet.kore + plunder);
                    if !losers.is_empty() {
                        debug!(%winner, ?losers, losses, "fleet battle won");
                    }
                    self.cells[index].fleet_id = Some(winner);
                }
                CollisionOutcome::Stalemate(ids) => {
                    let mut spilled = 0.0;
                    for id in &ids {
                        spilled += self.delete_fleet(id)?.kore;
                    }
                    let cell = &mut self.cells[index];
                    cell.kore = round_kore(cell.kore + spilled);
                    debug!(?ids, position = %cell.position, "fleet battle tied");
                }
            }
        }
        Ok(())
    }

    /// Enemy fleets that reached a shipyard either capture it or are
    /// absorbed by its garrison.
    pub(super) fn resolve_shipyard_collisions(&mut self) -> BoardResult<()> {
        let shipyard_ids: Vec<_> = self.shipyards.keys().cloned().collect();

        for shipyard_id in shipyard_ids {
            let shipyard = self.shipyard(&shipyard_id)?;
            let Some(fleet) = self.fleet_at(shipyard.position) else {
                continue;
            };
            if fleet.player_id == shipyard.player_id {
                continue;
            }

            let fleet_id = fleet.id.clone();
            if fleet.ship_count > shipyard.ship_count {
                let garrison = shipyard.ship_count;
                let lost = self.delete_shipyard(&shipyard_id)?;
                let attacker = self.delete_fleet(&fleet_id)?;
                let uid = self.create_uid();
                debug!(
                    shipyard = %shipyard_id,
                    new_shipyard = %uid,
                    attacker = attacker.player_id,
                    "shipyard captured"
                );
                self.add_shipyard(Shipyard::new(
                    uid,
                    attacker.ship_count - garrison,
                    lost.position,
                    attacker.player_id,
                    1,
                ))?;
                let player = self.player_mut(attacker.player_id)?;
                player.kore = round_kore(player.kore + attacker.kore);
            } else {
                let attacker = self.delete_fleet(&fleet_id)?;
                let shipyard = self.shipyard_mut(&shipyard_id)?;
                shipyard.ship_count -= attacker.ship_count;
                let owner = shipyard.player_id;
                let player = self.player_mut(owner)?;
                player.kore = round_kore(player.kore + attacker.kore);
                debug!(shipyard = %shipyard_id, attacker = %fleet_id, "shipyard held");
            }
        }
        Ok(())
    }

    /// Allied fleets on a shipyard dock: ships join the garrison and cargo
    /// goes to the owner.
    pub(super) fn dock_allied_fleets(&mut self) -> BoardResult<()> {
        let shipyard_ids: Vec<_> = self.shipyards.keys().cloned().collect();

        for shipyard_id in shipyard_ids {
            let shipyard = self.shipyard(&shipyard_id)?;
            let Some(fleet) = self.fleet_at(shipyard.position) else {
                continue;
            };
            if fleet.player_id != shipyard.player_id {
                continue;
            }

            let fleet_id = fleet.id.clone();
            let docked = self.delete_fleet(&fleet_id)?;
            let shipyard = self.shipyard_mut(&shipyard_id)?;
            shipyard.ship_count = shipyard.ship_count.saturating_add(docked.ship_count);
            let player = self.player_mut(docked.player_id)?;
            player.kore = round_kore(player.kore + docked.kore);
        }
        Ok(())
    }

    /// Fleets take damage from enemy fleets on the four neighbouring cells.
    ///
    /// All damage is computed before any is applied, so a fleet destroyed
    /// here still deals its damage this tick.
    pub(super) fn apply_adjacent_damage(&mut self) -> BoardResult<()> {
        let size = self.configuration.size;
        let mut incoming: Vec<(FleetId, u32)> = Vec::new();

        for fleet in self.fleets.values() {
            let damage: u32 = Direction::ALL
                .iter()
                .filter_map(|direction| {
                    self.fleet_at(fleet.position.translate(direction.to_point(), size))
                })
                .filter(|neighbour| neighbour.player_id != fleet.player_id)
                .fold(0u32, |total, neighbour| total.saturating_add(neighbour.ship_count));
            if damage > 0 {
                incoming.push((fleet.id.clone(), damage));
            }
        }

        for (fleet_id, damage) in incoming {
            let fleet = self.fleet_mut(&fleet_id)?;
            if damage < fleet.ship_count {
                fleet.ship_count -= damage;
                continue;
            }
            let destroyed = self.delete_fleet(&fleet_id)?;
            let index = self.cell_index(destroyed.position)?;
            let cell = &mut self.cells[index];
            cell.kore = round_kore(cell.kore + destroyed.kore);
            debug!(fleet = %fleet_id, damage, "fleet destroyed by adjacent enemies");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Point;

    fn fleet(id: &str, ships: u32, player_id: PlayerId) -> Fleet {
        Fleet::new(id, ships, Direction::North, Point::new(0, 0), 0.0, "", player_id)
    }

    #[test]
    fn test_single_fleet_wins_uncontested() {
        let a = fleet("a", 5, 0);
        assert_eq!(
            resolve_collision(&[&a]),
            CollisionOutcome::Winner {
                winner: "a".to_string(),
                losers: vec![],
                losses: 0
            }
        );
    }

    #[test]
    fn test_largest_fleet_wins() {
        let a = fleet("a", 10, 0);
        let b = fleet("b", 11, 1);
        let c = fleet("c", 2, 2);
        assert_eq!(
            resolve_collision(&[&a, &b, &c]),
            CollisionOutcome::Winner {
                winner: "b".to_string(),
                losers: vec!["a".to_string(), "c".to_string()],
                losses: 10
            }
        );
    }

    #[test]
    fn test_tie_is_stalemate() {
        let a = fleet("a", 10, 0);
        let b = fleet("b", 10, 1);
        let c = fleet("c", 3, 2);
        assert_eq!(
            resolve_collision(&[&a, &b, &c]),
            CollisionOutcome::Stalemate(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }
}
