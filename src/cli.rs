//! CLI command implementations for Kore.

pub(crate) mod new;
pub(crate) mod replay;
pub(crate) mod step;
pub(crate) mod verify;

mod output;

use clap::ValueEnum;
use kore::{Board, Configuration, Observation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Output format for the `step` and `replay` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// A match on disk: its parameters and the current tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MatchFile {
    pub(crate) configuration: Configuration,
    pub(crate) observation: Observation,
}

impl MatchFile {
    pub(crate) fn from_board(board: &Board) -> Self {
        Self {
            configuration: *board.configuration(),
            observation: board.to_observation(),
        }
    }

    pub(crate) fn load(path: &Path) -> Result<Self, CliError> {
        let json = fs::read_to_string(path)
            .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;
        Ok(serde_json::from_str(&json)?)
    }

    pub(crate) fn to_board(&self) -> Result<Board, CliError> {
        Ok(Board::from_observation(&self.observation, self.configuration)?)
    }
}

/// Write `json` to `path`, or to stdout without one.
pub(crate) fn emit_json(json: &str, path: Option<&Path>) -> Result<(), CliError> {
    match path {
        Some(path) => fs::write(path, json)
            .map_err(|e| CliError::new(format!("Failed to write {}: {e}", path.display()))),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

/// CLI error type.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("Invalid JSON: {e}"))
    }
}

impl From<kore::BoardError> for CliError {
    fn from(e: kore::BoardError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<kore::mapgen::MapGenError> for CliError {
    fn from(e: kore::mapgen::MapGenError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<kore::replay::ReplayError> for CliError {
    fn from(e: kore::replay::ReplayError) -> Self {
        Self::new(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_displays_message() {
        assert_eq!(CliError::new("no such match").to_string(), "no such match");
    }

    #[test]
    fn test_json_errors_are_labelled() {
        let Err(e) = serde_json::from_str::<MatchFile>("{ broken") else {
            panic!("malformed match file parsed");
        };
        assert!(CliError::from(e).to_string().starts_with("Invalid JSON: "));
    }
}
