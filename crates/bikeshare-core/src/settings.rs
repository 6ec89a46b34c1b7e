use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::catalog::Catalog;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Explore US bike-share trip data
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bikeshare",
    about = "Explore US bike-share trip data",
    version
)]
pub struct Settings {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// City for the first round (skips the city prompt)
    #[arg(long)]
    pub city: Option<String>,

    /// Month for the first round, or "all" (skips the month prompt)
    #[arg(long)]
    pub month: Option<String>,

    /// Day of week for the first round, or "all" (skips the day prompt)
    #[arg(long)]
    pub day: Option<String>,

    /// Give up after this many invalid answers to one prompt
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: Option<u32>,

    /// Report output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Logging level
    #[arg(
        long,
        default_value = "WARNING",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"]
    )]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// How the four reports are written to stdout.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable sections with timings
    #[default]
    Text,
    /// One pretty-printed JSON document per report
    Json,
}

impl Settings {
    /// Parse process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Default catalog rooted at `--data-dir`.
    pub fn catalog(&self) -> Catalog {
        Catalog::default().with_data_dir(&self.data_dir)
    }

    /// Bound for the input validator, `None` for unlimited retries.
    pub fn max_attempts(&self) -> Option<usize> {
        self.max_attempts.map(|n| n as usize)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
