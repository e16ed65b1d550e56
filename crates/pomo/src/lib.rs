//! pomo - Terminal focus timer with big ASCII clocks
//!
//! Cycles through focus periods, rests and long breaks, drawing a large
//! FIGlet clock over an animated background with a progress bar along the
//! bottom. Keys pause, skip, toggle elapsed/remaining time and quit.
//!
//! Modules, leaves first:
//! - layout, progress, background, banner: pure rendering helpers
//! - display, input, clock, sound: the terminal, keyboard, time and audio
//! - phase: phases and the session plan
//! - timer: the per-phase render/input loop
//! - sequencer: runs the plan and triggers notifications

pub mod background;
pub mod banner;
pub mod cli;
pub mod clock;
pub mod display;
pub mod input;
pub mod layout;
pub mod phase;
pub mod progress;
pub mod sequencer;
pub mod sound;
pub mod timer;

pub use phase::{Phase, PhaseKind, SessionPlan};
pub use sequencer::{Sequencer, SessionSummary};
pub use timer::{PhaseOutcome, PhaseReport, SessionTimer, TimerSettings};
