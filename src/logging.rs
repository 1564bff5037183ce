//! Tracing setup.
//!
//! The terminal belongs to the game screen, so log output goes to a file.
//! Without a log file no subscriber is installed and events are discarded.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` when set, otherwise `info` (or `debug` when verbose)
pub fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(level)
    })
}

fn file_subscriber(file: File, filter: EnvFilter) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .finish()
}

fn open_log(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))
}

/// Install the global subscriber. Returns whether logging is enabled.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<bool> {
    let Some(path) = log_file else {
        return Ok(false);
    };

    let file = open_log(path)?;
    tracing::subscriber::set_global_default(file_subscriber(file, filter(verbose)))
        .context("Failed to install tracing subscriber")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_log_file_means_no_subscriber() {
        assert!(!init(true, None).unwrap());
    }

    #[test]
    fn test_events_reach_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snake.log");
        let file = open_log(&path).unwrap();

        let subscriber = file_subscriber(file, EnvFilter::new("info"));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(score = 30, "game over");
            tracing::debug!("filtered out");
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("game over"));
        assert!(contents.contains("score=30"));
        assert!(!contents.contains("filtered out"));
    }

    #[test]
    fn test_unwritable_log_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("snake.log");

        assert!(init(false, Some(&path)).is_err());
    }
}
