//! Data layer for the bikeshare explorer.
//!
//! Reads a city's trip CSV into an in-memory [`dataset::Dataset`], derives
//! calendar fields, applies month/day filters and computes the four
//! descriptive reports.

pub mod dataset;
pub mod reader;
pub mod reports;
pub mod stats;

pub use bikeshare_core as core;
