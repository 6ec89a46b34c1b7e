//! Shared building blocks for the bikeshare explorer.
//!
//! Holds the error type, the city/name-table catalog, trip models, command
//! line settings and the small formatting and timestamp helpers used by the
//! data and runtime crates.

pub mod catalog;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{BikeshareError, Result};
