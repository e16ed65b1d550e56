//! Command-line interface

use clap::Parser;
use pomo_core::format::parse_minutes;
use pomo_core::{BackgroundMode, Config};
use std::path::PathBuf;

/// pomo - focus timer with big ASCII clocks
#[derive(Parser, Debug, Default)]
#[command(name = "pomo")]
#[command(about = "Terminal focus timer with big ASCII clocks and an animated background")]
#[command(version)]
#[command(after_help = r#"SESSION:
    A session is made of blocks. Each block is four focus periods with a
    rest between them, followed by one long break. A sound plays when a
    focus period or a long break ends.

KEYS:
    space, p    Pause / resume
    s, n        Skip to the next phase
    t, e        Toggle elapsed / remaining time
    q, Esc      Quit

DURATIONS:
    Plain numbers are minutes. Units are also accepted: 90s, 25m, 1h30m.

CONFIG:
    ~/.config/pomo/config.json (every field optional), for example:
    {"focus_minutes": 50, "rest_minutes": 10, "background": "matrix"}
    Flags override the config file. Set POMO_LOG=debug for more detail
    in the log file (~/.local/share/pomo/pomo.log).

EXAMPLES:
    pomo                          # 25/5/15 with falling snow
    pomo -f 50 -r 10 -b 2         # two blocks of 50 minute focus periods
    pomo --background matrix      # matrix rain instead of snow
    pomo -f 10s -r 5s -l 10s      # quick demo run
    pomo --plan                   # print the phases and exit
"#)]
pub struct Cli {
    /// Focus period length
    #[arg(short, long, value_name = "DURATION", value_parser = parse_minutes)]
    pub focus: Option<f64>,

    /// Rest length between focus periods
    #[arg(short, long, value_name = "DURATION", value_parser = parse_minutes)]
    pub rest: Option<f64>,

    /// Long break length at the end of each block
    #[arg(short, long, value_name = "DURATION", value_parser = parse_minutes)]
    pub long_break: Option<f64>,

    /// Number of blocks (four focus periods and a long break each)
    #[arg(short, long)]
    pub blocks: Option<u32>,

    /// Background animation: snow, matrix or none
    #[arg(long, value_name = "MODE", value_parser = parse_background)]
    pub background: Option<BackgroundMode>,

    /// Show elapsed time on the clock instead of time remaining
    #[arg(long)]
    pub show_elapsed: bool,

    /// Target redraws per second
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f64>,

    /// Never play the notification sound
    #[arg(long)]
    pub no_sound: bool,

    /// Sound file to play when a focus period or long break ends
    #[arg(long, value_name = "FILE")]
    pub sound_file: Option<PathBuf>,

    /// Config file to use instead of the default
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log file to append to instead of the default
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Print the session plan and exit
    #[arg(long)]
    pub plan: bool,
}

impl Cli {
    /// Apply every flag that was given on top of `config`
    pub fn apply(&self, config: &mut Config) {
        if let Some(focus) = self.focus {
            config.focus_minutes = focus;
        }
        if let Some(rest) = self.rest {
            config.rest_minutes = rest;
        }
        if let Some(long_break) = self.long_break {
            config.long_break_minutes = long_break;
        }
        if let Some(blocks) = self.blocks {
            config.blocks = blocks;
        }
        if let Some(background) = self.background {
            config.background = background;
        }
        if self.show_elapsed {
            config.show_elapsed = true;
        }
        if let Some(fps) = self.fps {
            config.frame_rate = fps;
        }
        if self.no_sound {
            config.sound.enabled = false;
        }
        if let Some(file) = &self.sound_file {
            config.sound.file = Some(file.clone());
        }
        if let Some(file) = &self.log_file {
            config.log_file = Some(file.clone());
        }
    }
}

fn parse_background(s: &str) -> Result<BackgroundMode, String> {
    BackgroundMode::from_str(s)
        .ok_or_else(|| format!("unknown background '{}' (expected snow, matrix or none)", s))
}
