//! Runtime layer for the bikeshare explorer.
//!
//! Drives the interactive console session: validated prompts, the
//! load-and-report round, and rendering of each report section.

pub mod prompt;
pub mod render;
pub mod session;

pub use bikeshare_core as core;
pub use bikeshare_data as data;
