//! Output formatting utilities for CLI.

use kore::Board;
use kore::replay::ReplayOutcome;
use serde::Serialize;
use std::fmt::Write;

/// JSON-serializable replay result.
#[derive(Debug, Serialize)]
pub(super) struct JsonReplayResult {
    /// Step of the final board.
    pub(super) step: u32,
    /// Whether the match had ended.
    pub(super) game_over: bool,
    /// Per-player standings.
    pub(super) players: Vec<JsonPlayerResult>,
    /// Per tick, per player, the actions seen.
    pub(super) actions: Vec<Vec<String>>,
}

/// JSON-serializable player standing.
#[derive(Debug, Serialize)]
pub(super) struct JsonPlayerResult {
    /// Player ID.
    pub(super) id: usize,
    /// Kore balance.
    pub(super) kore: f64,
    /// Ships docked or in flight.
    pub(super) ships: u64,
    /// Fleets owned.
    pub(super) fleets: usize,
    /// Shipyards owned.
    pub(super) shipyards: usize,
}

impl JsonReplayResult {
    /// Create from a replay outcome.
    pub(super) fn from_outcome(outcome: &ReplayOutcome) -> Self {
        Self {
            step: outcome.board.step(),
            game_over: outcome.board.is_game_over(),
            players: standings(&outcome.board),
            actions: outcome.summaries.clone(),
        }
    }
}

fn standings(board: &Board) -> Vec<JsonPlayerResult> {
    board
        .players()
        .iter()
        .map(|player| {
            let fleet_ships: u64 = board
                .fleets()
                .filter(|f| f.player_id == player.id)
                .map(|f| u64::from(f.ship_count))
                .sum();
            let yard_ships: u64 = board
                .shipyards()
                .filter(|s| s.player_id == player.id)
                .map(|s| u64::from(s.ship_count))
                .sum();
            JsonPlayerResult {
                id: player.id,
                kore: player.kore,
                ships: fleet_ships + yard_ships,
                fleets: player.fleet_ids.len(),
                shipyards: player.shipyard_ids.len(),
            }
        })
        .collect()
}

/// Format a board's standings as human-readable text.
pub(super) fn format_board_text(board: &Board) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Step {}", board.step());
    for player in standings(board) {
        let _ = writeln!(
            output,
            "  Player {}: {:.3} kore, {} ships, {} fleets, {} shipyards",
            player.id, player.kore, player.ships, player.fleets, player.shipyards
        );
    }
    if board.is_game_over() {
        output.push_str("  Game over\n");
    }

    output
}

/// Format a replay as one line per tick followed by final standings.
pub(super) fn format_replay_text(outcome: &ReplayOutcome) -> String {
    let mut output = String::new();

    for (tick, players) in outcome.summaries.iter().enumerate() {
        let line = players
            .iter()
            .enumerate()
            .map(|(id, actions)| format!("p{id}=[{actions}]"))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(output, "tick {tick}: {line}");
    }
    output.push_str(&format_board_text(&outcome.board));

    output
}
