//! Step command implementation.

use super::output::format_board_text;
use super::{CliError, MatchFile, OutputFormat, emit_json};
use kore::replay::{TickActions, apply_actions, format_actions};
use std::fs;
use std::path::PathBuf;

/// Execute the step command.
///
/// # Errors
///
/// Returns an error if a file cannot be read or the match is inconsistent.
pub(crate) fn execute(
    input: PathBuf,
    actions: Option<PathBuf>,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let mut board = MatchFile::load(&input)?.to_board()?;

    let actions: Vec<TickActions> = match actions {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;
            serde_json::from_str(&json)?
        }
        None => Vec::new(),
    };
    for (player_id, player_actions) in actions.iter().enumerate() {
        apply_actions(&mut board, player_id, player_actions)?;
    }

    let next = board.next()?;
    let json = serde_json::to_string_pretty(&MatchFile::from_board(&next))?;

    match format {
        OutputFormat::Json => emit_json(&json, output.as_deref()),
        OutputFormat::Text => {
            if let Some(path) = &output {
                emit_json(&json, Some(path))?;
            }
            for player in next.players() {
                println!(
                    "player {}: {}",
                    player.id,
                    format_actions(next.previous_actions(player.id)?)
                );
            }
            print!("{}", format_board_text(&next));
            Ok(())
        }
    }
}
