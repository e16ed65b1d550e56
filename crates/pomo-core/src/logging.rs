//! Append-only log file
//!
//! The terminal belongs to the timer display while a session runs, so all
//! diagnostics go to a plain text file instead. Each entry is written as
//! `[timestamp] message`.

use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `POMO_LOG=debug`)
pub const LOG_ENV: &str = "POMO_LOG";

/// Timestamps rendered as `[2024-01-31 09:15:00.123]`
#[derive(Debug, Clone, Copy, Default)]
pub struct BracketedLocalTime;

impl FormatTime for BracketedLocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "[{}]", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Open `path` for appending, creating it and its parent directory
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Build a subscriber that writes entries to `file`
pub fn file_subscriber(file: File, filter: EnvFilter) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(BracketedLocalTime)
        .with_ansi(false)
        .with_level(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .finish()
}

/// Install the global subscriber writing to `path`.
///
/// The filter comes from `POMO_LOG`, defaulting to `info`.
pub fn init(path: &Path) -> io::Result<()> {
    let file = open_log_file(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed (tests, embedding); keep it
    let _ = tracing::subscriber::set_global_default(file_subscriber(file, filter));
    Ok(())
}
