use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    fmt,
    prelude::*,
};

/// Maps `-q` / `-v` counts to the level applied to PepForge's own targets.
pub fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn targets(level: LevelFilter) -> Targets {
    Targets::new()
        .with_target("pepforge", level)
        .with_target("pepforge_cli", level)
        .with_default(LevelFilter::WARN.min(level))
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let level = level_for(verbosity, quiet);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact()
        .with_filter(targets(level));

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(CliError::Io)?;
            Some(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_thread_ids(true)
                    .with_target(true)
                    .with_filter(targets(level.max(LevelFilter::DEBUG))),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to install logger: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing::{debug, info, trace};

    #[test]
    fn verbosity_maps_to_increasing_levels() {
        assert_eq!(level_for(0, false), LevelFilter::WARN);
        assert_eq!(level_for(1, false), LevelFilter::INFO);
        assert_eq!(level_for(2, false), LevelFilter::DEBUG);
        assert_eq!(level_for(7, false), LevelFilter::TRACE);
        assert_eq!(level_for(3, true), LevelFilter::ERROR);
    }

    #[test]
    fn foreign_targets_are_capped_at_warn() {
        let filter = targets(LevelFilter::TRACE);
        assert!(filter.would_enable("pepforge::engine::generator", &tracing::Level::TRACE));
        assert!(!filter.would_enable("rayon_core", &tracing::Level::INFO));
    }

    #[test]
    #[serial]
    fn file_layer_records_debug_events_with_thread_ids() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("pepforge.log");

        let file = File::create(&log_path).unwrap();
        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_filter(targets(LevelFilter::DEBUG));
        let subscriber = tracing_subscriber::registry().with(file_layer);

        tracing::subscriber::with_default(subscriber, || {
            debug!(target: "pepforge::workflows", "Generated 12 candidates.");
            trace!(target: "pepforge::workflows", "hidden at debug");
            info!(target: "noisy_dependency", "filtered out");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Generated 12 candidates."));
        assert!(content.contains("DEBUG"));
        assert!(content.contains("ThreadId"));
        assert!(!content.contains("hidden at debug"));
        assert!(!content.contains("filtered out"));
    }

    #[test]
    #[serial]
    fn unwritable_log_file_propagates_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = setup_logging(0, false, Some(dir.path()));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
