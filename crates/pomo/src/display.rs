//! Terminal ownership and clipped drawing
//!
//! `DisplayContext` is created once at startup. It puts the terminal in raw
//! mode on the alternate screen with the cursor hidden, and puts everything
//! back when restored or dropped. Frames go through ratatui's double buffer,
//! so only cells that changed since the last frame reach the terminal.
//!
//! Drawing inside a frame goes through [`Canvas`], whose draw calls clip to
//! the current terminal size and report whether anything was cut off.
//! Callers ignore that result: a terminal resized mid-frame just shows less.

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::buffer::Buffer;
use ratatui::style::Style;
use ratatui::Terminal;
use std::io::{self, Stdout};

use crate::layout::{self, Anchor};

/// The terminal, owned for the lifetime of the program
pub struct DisplayContext<B: Backend> {
    terminal: Terminal<B>,
    /// Whether raw mode and the alternate screen must be undone on exit
    owns_tty: bool,
}

impl DisplayContext<CrosstermBackend<Stdout>> {
    /// Take over the real terminal
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = restore_terminal();
            return Err(err);
        }

        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(err) => {
                let _ = restore_terminal();
                return Err(err);
            }
        };

        Ok(Self {
            terminal,
            owns_tty: true,
        })
    }
}

impl<B: Backend> DisplayContext<B> {
    /// Wrap an existing terminal without touching tty modes
    pub fn with_terminal(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            owns_tty: false,
        }
    }

    /// Draw one frame. The canvas starts blank every frame.
    pub fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Canvas<'_>),
    {
        self.terminal.draw(|frame| {
            let mut canvas = Canvas::new(frame.buffer_mut());
            render(&mut canvas);
        })?;
        Ok(())
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Give the terminal back. Safe to call more than once.
    pub fn restore(&mut self) -> io::Result<()> {
        if self.owns_tty {
            self.owns_tty = false;
            restore_terminal()?;
        }
        Ok(())
    }
}

impl<B: Backend> Drop for DisplayContext<B> {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Leave raw mode and the alternate screen, show the cursor
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)
}

/// Restore the terminal before the default panic message is printed
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        previous(info);
    }));
}

/// Clipped drawing surface for one frame
pub struct Canvas<'a> {
    buf: &'a mut Buffer,
}

impl<'a> Canvas<'a> {
    pub fn new(buf: &'a mut Buffer) -> Self {
        Self { buf }
    }

    pub fn height(&self) -> u16 {
        self.buf.area.height
    }

    pub fn width(&self) -> u16 {
        self.buf.area.width
    }

    /// Draw a multi-line block at `anchor`, shifted by the offsets.
    ///
    /// Returns true if the whole block fit on screen.
    pub fn try_draw(
        &mut self,
        block: &str,
        anchor: Anchor,
        style: Style,
        offset_y: i32,
        offset_x: i32,
    ) -> bool {
        let (row, col) = layout::place(
            block,
            anchor,
            self.height(),
            self.width(),
            offset_y,
            offset_x,
        );

        let mut complete = true;
        for (i, line) in block.lines().enumerate() {
            let fits = u16::try_from(i)
                .ok()
                .and_then(|i| row.checked_add(i))
                .map(|row| self.try_draw_at(row, col, line, style))
                .unwrap_or(false);
            complete &= fits;
        }
        complete
    }

    /// Draw one line of text at (row, col), cutting it at the right edge.
    ///
    /// Returns true if the whole line fit on screen.
    pub fn try_draw_at(&mut self, row: u16, col: u16, text: &str, style: Style) -> bool {
        let area = self.buf.area;
        if row >= area.height || col >= area.width {
            return text.is_empty();
        }

        let available = (area.width - col) as usize;
        self.buf
            .set_stringn(area.x + col, area.y + row, text, available, style);
        text.chars().count() <= available
    }
}
