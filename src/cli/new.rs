//! New-match command implementation.

use super::{CliError, MatchFile, emit_json};
use kore::Configuration;
use kore::mapgen::generate_board;
use std::fs;
use std::path::PathBuf;

/// Execute the new command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the output cannot be written.
pub(crate) fn execute(
    size: Option<i32>,
    seed: Option<u64>,
    players: usize,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let mut configuration = match config {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;
            serde_json::from_str(&json)?
        }
        None => Configuration::default(),
    };
    if let Some(size) = size {
        configuration.size = size;
    }
    if let Some(seed) = seed {
        configuration.random_seed = seed;
    }

    let board = generate_board(configuration, players)?;
    let json = serde_json::to_string_pretty(&MatchFile::from_board(&board))?;
    emit_json(&json, output.as_deref())
}
