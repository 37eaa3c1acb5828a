//! Replay command implementation.

use super::output::{JsonReplayResult, format_replay_text};
use super::{CliError, OutputFormat};
use kore::replay::{Recording, replay};
use std::path::PathBuf;

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or does not replay.
pub(crate) fn execute(recording_path: PathBuf, format: OutputFormat) -> Result<(), CliError> {
    let recording = Recording::load(&recording_path).map_err(|e| {
        CliError::new(format!("Failed to load recording {}: {e}", recording_path.display()))
    })?;

    let outcome = replay(&recording)?;

    match format {
        OutputFormat::Text => print!("{}", format_replay_text(&outcome)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonReplayResult::from_outcome(&outcome))
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
