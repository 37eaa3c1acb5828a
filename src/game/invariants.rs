//! Board invariants - sanity checks that detect bookkeeping bugs.
//!
//! These should NEVER trigger on a board produced by [`Board::next`] from a
//! consistent board. If they do, it indicates a bug.

use std::collections::BTreeSet;

use crate::game::Board;

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invariant violation: {message}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl InvariantViolation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn check_kore(label: &str, kore: f64, violations: &mut Vec<InvariantViolation>) {
    if !kore.is_finite() || kore < 0.0 {
        violations.push(InvariantViolation::new(format!("{label} has kore {kore}")));
    }
}

/// Check all board invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(board: &Board) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let size = board.configuration.size;

    // Cells point at entities standing on them
    for cell in &board.cells {
        check_kore(&format!("cell {}", cell.position), cell.kore, &mut violations);

        if let Some(id) = &cell.fleet_id {
            match board.fleets.get(id) {
                Some(fleet) if fleet.position == cell.position => {}
                Some(fleet) => violations.push(InvariantViolation::new(format!(
                    "cell {} references fleet {id} standing on {}",
                    cell.position, fleet.position
                ))),
                None => violations.push(InvariantViolation::new(format!(
                    "cell {} references missing fleet {id}",
                    cell.position
                ))),
            }
        }
        if let Some(id) = &cell.shipyard_id {
            match board.shipyards.get(id) {
                Some(shipyard) if shipyard.position == cell.position => {}
                Some(shipyard) => violations.push(InvariantViolation::new(format!(
                    "cell {} references shipyard {id} standing on {}",
                    cell.position, shipyard.position
                ))),
                None => violations.push(InvariantViolation::new(format!(
                    "cell {} references missing shipyard {id}",
                    cell.position
                ))),
            }
        }
    }

    // Every entity is registered on its cell, at most one of each kind per cell
    let mut fleet_cells = BTreeSet::new();
    for fleet in board.fleets.values() {
        if fleet.ship_count == 0 {
            violations.push(InvariantViolation::new(format!("fleet {} has no ships", fleet.id)));
        }
        check_kore(&format!("fleet {}", fleet.id), fleet.kore, &mut violations);
        if !fleet.position.in_bounds(size) {
            violations.push(InvariantViolation::new(format!(
                "fleet {} is off the board at {}",
                fleet.id, fleet.position
            )));
            continue;
        }
        if !fleet_cells.insert(fleet.position) {
            violations.push(InvariantViolation::new(format!(
                "more than one fleet on {}",
                fleet.position
            )));
        }
        if board.cells[fleet.position.to_index(size)].fleet_id.as_ref() != Some(&fleet.id) {
            violations.push(InvariantViolation::new(format!(
                "fleet {} is not registered on its cell",
                fleet.id
            )));
        }
    }

    let mut shipyard_cells = BTreeSet::new();
    for shipyard in board.shipyards.values() {
        if !shipyard.position.in_bounds(size) {
            violations.push(InvariantViolation::new(format!(
                "shipyard {} is off the board at {}",
                shipyard.id, shipyard.position
            )));
            continue;
        }
        if !shipyard_cells.insert(shipyard.position) {
            violations.push(InvariantViolation::new(format!(
                "more than one shipyard on {}",
                shipyard.position
            )));
        }
        let cell = &board.cells[shipyard.position.to_index(size)];
        if cell.shipyard_id.as_ref() != Some(&shipyard.id) {
            violations.push(InvariantViolation::new(format!(
                "shipyard {} is not registered on its cell",
                shipyard.id
            )));
        }
    }

    // Ownership lists match entity owners
    for player in &board.players {
        check_kore(&format!("player {}", player.id), player.kore, &mut violations);

        for id in &player.fleet_ids {
            if board.fleets.get(id).map(|f| f.player_id) != Some(player.id) {
                violations.push(InvariantViolation::new(format!(
                    "player {} lists fleet {id} it does not own",
                    player.id
                )));
            }
        }
        for id in &player.shipyard_ids {
            if board.shipyards.get(id).map(|s| s.player_id) != Some(player.id) {
                violations.push(InvariantViolation::new(format!(
                    "player {} lists shipyard {id} it does not own",
                    player.id
                )));
            }
        }
    }

    let listed_fleets: usize = board.players.iter().map(|p| p.fleet_ids.len()).sum();
    let listed_shipyards: usize = board.players.iter().map(|p| p.shipyard_ids.len()).sum();
    if listed_fleets != board.fleets.len() || listed_shipyards != board.shipyards.len() {
        violations.push(InvariantViolation::new(format!(
            "players list {listed_fleets} fleets and {listed_shipyards} shipyards, \
             board holds {} and {}",
            board.fleets.len(),
            board.shipyards.len()
        )));
    }

    violations
}

/// Assert all board invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(board: &Board) {
    let violations = check_invariants(board);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Board invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_board: &Board) {}
