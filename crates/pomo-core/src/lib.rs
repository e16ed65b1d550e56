//! pomo-core - Shared functionality for the pomo focus timer
//!
//! Everything here is independent of the terminal: standard paths, the
//! configuration file, time formatting and the log file.

pub mod config;
pub mod format;
pub mod logging;
pub mod paths;

pub use config::{BackgroundMode, Config, ConfigError};
pub use paths::Paths;
