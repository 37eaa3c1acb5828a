//! Verify command implementation.

use super::CliError;
use indicatif::{ProgressBar, ProgressStyle};
use kore::replay::{Recording, replay};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;

/// Execute the verify command.
///
/// Every recording is replayed independently; the command fails if any of
/// them cannot be loaded, cannot be stepped, or ends in a different state
/// than recorded.
///
/// # Errors
///
/// Returns an error naming the number of failed recordings.
pub(crate) fn execute(
    recordings: Vec<PathBuf>,
    threads: Option<usize>,
    progress: bool,
) -> Result<(), CliError> {
    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = if progress {
        let pb = ProgressBar::new(recordings.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} recordings ({per_sec})")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    let results: Vec<(PathBuf, Result<u32, String>)> = recordings
        .into_par_iter()
        .map(|path| {
            let result = Recording::load(&path)
                .and_then(|recording| replay(&recording))
                .map(|outcome| outcome.board.step())
                .map_err(|e| e.to_string());
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            (path, result)
        })
        .collect();

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let mut failures = 0usize;
    for (path, result) in &results {
        match result {
            Ok(step) => println!("ok      {} (step {step})", path.display()),
            Err(e) => {
                failures += 1;
                println!("FAILED  {}: {e}", path.display());
            }
        }
    }
    println!(
        "{} recordings verified in {:.2}s, {failures} failed",
        results.len(),
        start.elapsed().as_secs_f64()
    );

    if failures > 0 {
        return Err(CliError::new(format!("{failures} recording(s) failed verification")));
    }
    Ok(())
}
