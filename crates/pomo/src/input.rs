//! Keyboard commands
//!
//! The timer calls [`KeySource::poll_key`] once per loop iteration with the
//! longest time it is willing to wait. A key press or a terminal resize ends
//! the wait at once; "no key" is the normal outcome.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::time::Duration;

/// What a key press asks the timer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pause or resume the current phase
    TogglePause,
    /// End the current phase now
    Skip,
    /// Switch the clock between elapsed and remaining time
    ToggleDisplay,
    /// Leave the program
    Quit,
    /// Ctrl-C in raw mode
    Interrupt,
    /// The terminal changed size and needs a full redraw
    Resize,
}

/// Source of keyboard commands
pub trait KeySource {
    /// Wait at most `wait` for a recognised key
    fn poll_key(&mut self, wait: Duration) -> io::Result<Option<Command>>;
}

/// Reads keys from the terminal through crossterm
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn poll_key(&mut self, wait: Duration) -> io::Result<Option<Command>> {
        if !event::poll(wait)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => Ok(map_key(key)),
            Event::Resize(_, _) => Ok(Some(Command::Resize)),
            _ => Ok(None),
        }
    }
}

/// Translate a key event; releases, repeats and unknown keys map to None
pub fn map_key(key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Interrupt),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::TogglePause),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('n') | KeyCode::Char('N') => {
            Some(Command::Skip)
        }
        KeyCode::Char('t') | KeyCode::Char('T') | KeyCode::Char('e') | KeyCode::Char('E') => {
            Some(Command::ToggleDisplay)
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) use scripted::ScriptedKeys;

#[cfg(test)]
mod scripted {
    use super::{Command, KeySource};
    use crate::clock::{Clock, FakeClock};
    use std::collections::VecDeque;
    use std::io;
    use std::time::Duration;

    /// Replays commands at fixed times on a [`FakeClock`].
    ///
    /// Waiting advances the shared clock, either by the full wait or up to
    /// the next scripted key.
    pub(crate) struct ScriptedKeys {
        clock: FakeClock,
        script: VecDeque<(Duration, Command)>,
        pub(crate) polls: usize,
    }

    impl ScriptedKeys {
        pub(crate) fn new(clock: FakeClock, mut script: Vec<(Duration, Command)>) -> Self {
            script.sort_by_key(|(at, _)| *at);
            Self {
                clock,
                script: script.into(),
                polls: 0,
            }
        }

        pub(crate) fn idle(clock: FakeClock) -> Self {
            Self::new(clock, Vec::new())
        }
    }

    impl KeySource for ScriptedKeys {
        fn poll_key(&mut self, wait: Duration) -> io::Result<Option<Command>> {
            self.polls += 1;
            let now = self.clock.now();

            match self.script.front() {
                Some(&(at, command)) if at <= now + wait => {
                    if at > now {
                        self.clock.set(at);
                    }
                    self.script.pop_front();
                    Ok(Some(command))
                }
                _ => {
                    self.clock.advance(wait);
                    Ok(None)
                }
            }
        }
    }
}
