//! Services
//!
//! - `refresh_runner` - Runs refresh callbacks in the background
//! - `source` - Loads rows from files and commands

pub mod refresh_runner;
pub mod source;

pub use refresh_runner::{RefreshCallback, RefreshOutcome, RefreshRunner};
pub use source::{DataSource, SourceError};
