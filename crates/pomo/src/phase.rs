//! Phases and the session plan
//!
//! A session is made of blocks. Each block is four focus periods with a
//! rest between them, followed by one long break:
//!
//! ```text
//! focus rest focus rest focus rest focus long-break
//! ```

use pomo_core::format::format_duration;
use pomo_core::Config;
use ratatui::style::Color;
use std::fmt;
use std::time::Duration;

/// Focus periods in one block
pub const FOCUS_PER_BLOCK: usize = 4;

/// Kind of timed segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Focus,
    Rest,
    LongBreak,
}

impl PhaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Focus => "focus",
            PhaseKind::Rest => "rest",
            PhaseKind::LongBreak => "long break",
        }
    }

    /// Banner text shown in the top-left corner
    pub fn title(&self) -> &'static str {
        match self {
            PhaseKind::Focus => "focus...",
            PhaseKind::Rest => "take a break...",
            PhaseKind::LongBreak => "long break...",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            PhaseKind::Focus => Color::Red,
            PhaseKind::Rest => Color::Green,
            PhaseKind::LongBreak => Color::Magenta,
        }
    }

    /// Whether finishing this phase plays the notification sound
    pub fn plays_sound(&self) -> bool {
        matches!(self, PhaseKind::Focus | PhaseKind::LongBreak)
    }
}

/// One timed segment of the session
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub kind: PhaseKind,
    pub duration: Duration,
    /// Block this phase belongs to (1-based)
    pub block: u32,
    /// Position in the whole plan (1-based)
    pub position: usize,
    pub title: String,
    pub subtitle: String,
    pub body: String,
}

impl Phase {
    pub fn color(&self) -> Color {
        self.kind.color()
    }

    pub fn plays_sound(&self) -> bool {
        self.kind.plays_sound()
    }
}

/// The ordered list of phases for a whole run. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    phases: Vec<Phase>,
}

impl SessionPlan {
    pub fn build(focus: Duration, rest: Duration, long_break: Duration, blocks: u32) -> Self {
        let mut skeleton = Vec::new();
        for block in 1..=blocks {
            for i in 0..FOCUS_PER_BLOCK {
                skeleton.push((block, PhaseKind::Focus, focus));
                if i + 1 < FOCUS_PER_BLOCK {
                    skeleton.push((block, PhaseKind::Rest, rest));
                }
            }
            skeleton.push((block, PhaseKind::LongBreak, long_break));
        }

        let total = skeleton.len();
        let phases = skeleton
            .iter()
            .enumerate()
            .map(|(i, &(block, kind, duration))| {
                let body = match skeleton.get(i + 1) {
                    Some(&(_, next, next_duration)) => {
                        format!("up next: {} {}", next.as_str(), format_duration(next_duration))
                    }
                    None => "last one!".to_string(),
                };

                Phase {
                    kind,
                    duration,
                    block,
                    position: i + 1,
                    title: kind.title().to_string(),
                    subtitle: format!("block {}/{}  phase {}/{}", block, blocks, i + 1, total),
                    body,
                }
            })
            .collect();

        Self { phases }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::build(
            config.focus_duration(),
            config.rest_duration(),
            config.long_break_duration(),
            config.blocks,
        )
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn total_duration(&self) -> Duration {
        self.phases.iter().map(|p| p.duration).sum()
    }
}

impl fmt::Display for SessionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for phase in &self.phases {
            writeln!(
                f,
                "{:>3}. {:<11} {:>8}  (block {})",
                phase.position,
                phase.kind.as_str(),
                format_duration(phase.duration),
                phase.block
            )?;
        }
        write!(
            f,
            "{} phases, {} total",
            self.phases.len(),
            format_duration(self.total_duration())
        )
    }
}
