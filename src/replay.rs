//! Match recordings and replay verification.
//!
//! Because [`Board::next`] is deterministic, a recording only needs:
//! - the configuration and the tick-0 observation
//! - every action each player submitted, as agent-facing action text
//!
//! Replaying re-runs the match from tick 0. A recording may also carry the
//! expected final observation, which turns a replay into a verification.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::BoardError;
use crate::game::{Board, Configuration, Observation, ShipyardAction, ShipyardId};

/// Actions one player submitted for one tick, keyed by shipyard id.
pub type TickActions = BTreeMap<ShipyardId, String>;

/// Replay failure.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Reading or writing a recording failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// A recording file is not valid JSON.
    #[error("malformed recording: {0}")]
    Json(#[from] serde_json::Error),
    /// The board became inconsistent while replaying.
    #[error("tick {tick}: {source}")]
    Board {
        /// Tick being resolved.
        tick: u32,
        /// Underlying error.
        source: BoardError,
    },
    /// The replayed match ended somewhere other than recorded.
    #[error("replay diverged from the recorded final state at step {step}")]
    Mismatch {
        /// Step of the final board.
        step: u32,
    },
}

/// A complete match: starting point plus every submitted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    /// Match parameters.
    pub configuration: Configuration,
    /// State at the first recorded tick.
    pub initial: Observation,
    /// Per tick, per player, the submitted actions.
    pub ticks: Vec<Vec<TickActions>>,
    /// Expected state after the last tick, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Observation>,
}

impl Recording {
    /// Start recording from `board`.
    #[must_use]
    pub fn new(board: &Board) -> Self {
        Self {
            configuration: *board.configuration(),
            initial: board.to_observation(),
            ticks: Vec::new(),
            expected: None,
        }
    }

    /// Append the actions of one tick.
    pub fn push_tick(&mut self, actions: Vec<TickActions>) {
        self.ticks.push(actions);
    }

    /// Remember `board` as the state the replay must reach.
    pub fn set_expected(&mut self, board: &Board) {
        self.expected = Some(board.to_observation());
    }

    /// Save the recording as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a recording from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let json = fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Result of a successful replay.
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    /// Board after the last tick.
    pub board: Board,
    /// Per tick, per player, the actions the engine saw, in
    /// `"<shipyardId>:<action>"` form.
    pub summaries: Vec<Vec<String>>,
}

/// Render an action log as comma-joined `"<shipyardId>:<action>"` tokens.
#[must_use]
pub fn format_actions(actions: &[(ShipyardId, ShipyardAction)]) -> String {
    actions
        .iter()
        .map(|(id, action)| format!("{id}:{action}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Attach one player's textual actions to their shipyards.
///
/// Unparsable actions and shipyards the player does not own are skipped.
///
/// # Errors
///
/// Returns an error only if `player_id` is not on the board.
pub fn apply_actions(
    board: &mut Board,
    player_id: usize,
    actions: &TickActions,
) -> Result<(), BoardError> {
    board.player(player_id)?;
    for (shipyard_id, text) in actions {
        let owned = board
            .shipyard(shipyard_id)
            .is_ok_and(|shipyard| shipyard.player_id == player_id);
        if !owned {
            warn!(
                player = player_id,
                shipyard = %shipyard_id,
                "skipping action for a shipyard the player does not own"
            );
            continue;
        }
        match text.parse::<ShipyardAction>() {
            Ok(action) => board.set_next_action(shipyard_id, action)?,
            Err(e) => warn!(
                player = player_id,
                shipyard = %shipyard_id,
                error = %e,
                "skipping malformed action"
            ),
        }
    }
    Ok(())
}

/// Re-run a recorded match.
///
/// # Errors
///
/// Returns an error if the board cannot be built or stepped, or if the
/// final state differs from the recorded one.
pub fn replay(recording: &Recording) -> Result<ReplayOutcome, ReplayError> {
    let initial_step = recording.initial.step;
    let mut board = Board::from_observation(&recording.initial, recording.configuration)
        .map_err(|source| ReplayError::Board {
            tick: initial_step,
            source,
        })?;
    let mut summaries = Vec::with_capacity(recording.ticks.len());

    for tick_actions in &recording.ticks {
        let tick = board.step();
        let board_error = |source| ReplayError::Board { tick, source };

        for (player_id, actions) in tick_actions.iter().enumerate() {
            apply_actions(&mut board, player_id, actions).map_err(board_error)?;
        }
        board = board.next().map_err(board_error)?;

        let summary = (0..board.players().len())
            .map(|player_id| board.previous_actions(player_id).map(format_actions))
            .collect::<Result<Vec<_>, _>>()
            .map_err(board_error)?;
        summaries.push(summary);
    }

    if let Some(expected) = &recording.expected {
        if &board.to_observation() != expected {
            return Err(ReplayError::Mismatch { step: board.step() });
        }
    }

    debug!(ticks = recording.ticks.len(), step = board.step(), "replay finished");
    Ok(ReplayOutcome { board, summaries })
}

/// Replay many recordings in parallel.
///
/// Results are returned in input order.
#[must_use]
pub fn replay_many(recordings: &[Recording]) -> Vec<Result<ReplayOutcome, ReplayError>> {
    recordings.par_iter().map(replay).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Point, Shipyard};

    fn board() -> Board {
        let config = Configuration {
            size: 7,
            ..Configuration::default()
        };
        let mut board = Board::new(config, vec![2.0; 49], 2).unwrap();
        board
            .add_shipyard(Shipyard::new("0-1", 10, Point::new(1, 1), 0, 0))
            .unwrap();
        board
            .add_shipyard(Shipyard::new("0-2", 10, Point::new(5, 5), 1, 0))
            .unwrap();
        board
    }

    fn actions(pairs: &[(&str, &str)]) -> TickActions {
        pairs
            .iter()
            .map(|(id, action)| ((*id).to_string(), (*action).to_string()))
            .collect()
    }

    #[test]
    fn test_format_actions() {
        let log = vec![
            ("0-1".to_string(), ShipyardAction::spawn_ships(2)),
            ("0-3".to_string(), ShipyardAction::launch_fleet_with_flight_plan(5, "N")),
        ];
        assert_eq!(format_actions(&log), "0-1:SPAWN_2,0-3:LAUNCH_5_N");
        assert_eq!(format_actions(&[]), "");
    }

    #[test]
    fn test_apply_actions_skips_foreign_and_malformed() {
        let mut board = board();
        let submitted = actions(&[("0-1", "SPAWN_1"), ("0-2", "SPAWN_1"), ("9-9", "SPAWN_1")]);
        apply_actions(&mut board, 0, &submitted).unwrap();
        assert!(board.shipyard("0-1").unwrap().next_action.is_some());
        assert!(board.shipyard("0-2").unwrap().next_action.is_none());

        apply_actions(&mut board, 1, &actions(&[("0-2", "FLY_AWAY")])).unwrap();
        assert!(board.shipyard("0-2").unwrap().next_action.is_none());
    }

    #[test]
    fn test_replay_matches_live_run() {
        let start = board();
        let mut recording = Recording::new(&start);
        let mut live = start;

        let script = [
            vec![actions(&[("0-1", "SPAWN_1")]), actions(&[("0-2", "LAUNCH_3_E")])],
            vec![actions(&[("0-1", "LAUNCH_4_N")]), TickActions::new()],
            vec![TickActions::new(), TickActions::new()],
        ];
        for tick in script {
            for (player_id, submitted) in tick.iter().enumerate() {
                apply_actions(&mut live, player_id, submitted).unwrap();
            }
            live = live.next().unwrap();
            recording.push_tick(tick);
        }
        recording.set_expected(&live);

        let outcome = replay(&recording).unwrap();
        assert_eq!(outcome.board.to_observation(), live.to_observation());
        assert_eq!(outcome.summaries.len(), 3);
        assert_eq!(outcome.summaries[0], vec!["0-1:SPAWN_1", "0-2:LAUNCH_3_E"]);
        assert_eq!(outcome.summaries[2], vec!["", ""]);
    }

    #[test]
    fn test_replay_detects_divergence() {
        let start = board();
        let mut recording = Recording::new(&start);
        recording.push_tick(vec![TickActions::new(), TickActions::new()]);
        recording.set_expected(&start);

        assert!(matches!(
            replay(&recording),
            Err(ReplayError::Mismatch { step: 1 })
        ));
    }

    #[test]
    fn test_replay_many_keeps_order() {
        let start = board();
        let mut short = Recording::new(&start);
        short.push_tick(vec![TickActions::new(), TickActions::new()]);
        let long = Recording {
            ticks: vec![vec![]; 4],
            ..short.clone()
        };

        let results = replay_many(&[short, long]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().board.step(), 1);
        assert_eq!(results[1].as_ref().unwrap().board.step(), 4);
    }
}
