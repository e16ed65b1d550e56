//! Configuration file handling
//!
//! The config file is JSON and every field is optional, so a file holding
//! only `{"focus_minutes": 50}` is valid. Command-line flags are applied on
//! top of whatever is loaded here.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Animated background shown behind the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    /// Sparse falling snow
    #[default]
    Snow,
    /// Dense matrix rain
    Matrix,
    /// No background
    #[serde(alias = "off")]
    None,
}

impl BackgroundMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundMode::Snow => "snow",
            BackgroundMode::Matrix => "matrix",
            BackgroundMode::None => "none",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "snow" => Some(BackgroundMode::Snow),
            "matrix" => Some(BackgroundMode::Matrix),
            "none" | "off" => Some(BackgroundMode::None),
            _ => None,
        }
    }
}

/// Notification sound settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    /// Play a sound when focus periods and long breaks end
    pub enabled: bool,
    /// Sound file to play instead of the system default
    pub file: Option<PathBuf>,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: None,
        }
    }
}

/// FIGlet font files (.flf); unset entries use the built-in standard font
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub title: Option<PathBuf>,
    pub clock: Option<PathBuf>,
    pub overlay: Option<PathBuf>,
}

/// Full pomo configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub focus_minutes: f64,
    pub rest_minutes: f64,
    pub long_break_minutes: f64,
    /// Number of blocks; each block is four focus periods and a long break
    pub blocks: u32,
    pub background: BackgroundMode,
    /// Show elapsed time on the big clock instead of time remaining
    pub show_elapsed: bool,
    /// Target redraws per second
    pub frame_rate: f64,
    /// Longest time the loop waits for a key before re-checking the clock
    pub poll_interval_ms: u64,
    pub sound: SoundConfig,
    pub fonts: FontConfig,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            focus_minutes: 25.0,
            rest_minutes: 5.0,
            long_break_minutes: 15.0,
            blocks: 1,
            background: BackgroundMode::default(),
            show_elapsed: false,
            frame_rate: 15.0,
            poll_interval_ms: 20,
            sound: SoundConfig::default(),
            fonts: FontConfig::default(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load the config file at `path`, or defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a config file the user named explicitly; it must exist
    pub fn load_required(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Self::load(path)
    }

    /// Check that every value is usable by the timer
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, minutes) in [
            ("focus_minutes", self.focus_minutes),
            ("rest_minutes", self.rest_minutes),
            ("long_break_minutes", self.long_break_minutes),
        ] {
            if !minutes.is_finite() || minutes <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a positive number of minutes, got {}",
                    name, minutes
                )));
            }
        }

        if self.blocks == 0 {
            return Err(ConfigError::Invalid("blocks must be at least 1".to_string()));
        }

        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "frame_rate must be positive, got {}",
                self.frame_rate
            )));
        }

        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn focus_duration(&self) -> Duration {
        minutes(self.focus_minutes)
    }

    pub fn rest_duration(&self) -> Duration {
        minutes(self.rest_minutes)
    }

    pub fn long_break_duration(&self) -> Duration {
        minutes(self.long_break_minutes)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn minutes(value: f64) -> Duration {
    Duration::try_from_secs_f64(value * 60.0).unwrap_or(Duration::ZERO)
}
