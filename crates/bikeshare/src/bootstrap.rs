use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use bikeshare_core::catalog::Catalog;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` value to an [`EnvFilter`] directive.
///
/// Unknown strings are passed through so `RUST_LOG`-style directives also work.
fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Logs go to `log_file` when given, otherwise to stderr, so they never mix
/// with the reports on stdout. Falls back to `"warn"` if the level string is
/// not a valid directive.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }

    Ok(())
}

// ── Data-file check ────────────────────────────────────────────────────────────

/// Cities whose source file is absent from the data directory.
///
/// Missing files only fail once that city is chosen, so this just warns.
pub fn missing_sources(catalog: &Catalog) -> Vec<String> {
    let missing: Vec<String> = catalog
        .cities
        .iter()
        .filter(|c| !catalog.data_dir.join(&c.file_name).is_file())
        .map(|c| c.name.clone())
        .collect();

    for city in &missing {
        warn!(
            "No data file for {} in {}",
            city,
            catalog.data_dir.display()
        );
    }
    missing
}

// ── Tests ──────────────────────────────────────────────────────────────────────
