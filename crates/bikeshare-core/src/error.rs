use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the bikeshare explorer.
#[derive(Error, Debug)]
pub enum BikeshareError {
    /// A bounded prompt received too many answers outside the accepted set.
    #[error("Invalid input: no accepted answer after {attempts} attempts")]
    InvalidInput { attempts: usize },

    /// The input source ended while a prompt was waiting for an answer.
    #[error("Input closed before a valid answer was given")]
    InputClosed,

    /// A city name is not part of the catalog.
    #[error("Unknown city: {0}")]
    UnknownCity(String),

    /// A month name is not part of the catalog month table.
    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    /// A day name is not part of the catalog day table.
    #[error("Invalid day: {0}")]
    InvalidDay(String),

    /// A source file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV row could not be read or deserialized.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A `Start Time` value did not match any recognised format.
    #[error("Invalid start time on row {row}: {value}")]
    TimestampParse { row: usize, value: String },

    /// A column is absent from the source schema.
    #[error("Column not available: {0}")]
    MissingColumn(&'static str),

    /// A statistic has no defined value over zero rows.
    #[error("No data to compute {0}")]
    EmptyDataset(&'static str),

    /// A report could not be rendered as JSON.
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for console I/O errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the bikeshare crates.
pub type Result<T> = std::result::Result<T, BikeshareError>;
