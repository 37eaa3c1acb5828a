//! Kore CLI - Command-line interface for creating, stepping and verifying matches.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Kore - A deterministic Kore fleets turn engine
#[derive(Parser, Debug)]
#[command(name = "kore")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a new match file at tick 0
    New {
        /// Board side length (default: 21)
        #[arg(long)]
        size: Option<i32>,

        /// Random seed for the kore layout
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of players: 1, 2 or 4
        #[arg(short, long, default_value = "2")]
        players: usize,

        /// Configuration JSON to start from
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the match here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve one tick of a match file
    Step {
        /// Match file
        #[arg(required = true)]
        input: PathBuf,

        /// Actions JSON: one `{shipyardId: action}` object per player
        #[arg(short, long)]
        actions: Option<PathBuf>,

        /// Write the next match here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Replay a recorded match
    Replay {
        /// Recording file
        #[arg(required = true)]
        recording: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Verify many recordings in parallel
    Verify {
        /// Recording files
        #[arg(required = true, num_args = 1..)]
        recordings: Vec<PathBuf>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kore=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::New {
            size,
            seed,
            players,
            config,
            output,
        } => cli::new::execute(size, seed, players, config, output),

        Commands::Step {
            input,
            actions,
            output,
            format,
        } => cli::step::execute(input, actions, output, format),

        Commands::Replay { recording, format } => cli::replay::execute(recording, format),

        Commands::Verify {
            recordings,
            threads,
            progress,
        } => cli::verify::execute(recordings, threads, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
