//! Big ASCII-art text
//!
//! Titles, the clock and the paused/skipped overlays are rendered through
//! FIGlet fonts. Each style can use its own `.flf` font file; anything not
//! configured uses the standard font that ships with figlet-rs.

use anyhow::{anyhow, Result};
use figlet_rs::FIGfont;
use pomo_core::config::FontConfig;
use std::path::Path;

/// What a banner is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerStyle {
    /// Phase title in the top-left corner
    Title,
    /// The big clock
    Clock,
    /// Transient "paused" / "skipped" messages
    Overlay,
}

/// Turns text into a multi-line glyph block
pub trait Banner {
    fn render(&self, text: &str, style: BannerStyle) -> String;
}

/// FIGlet-backed banner
pub struct FigletBanner {
    title: FIGfont,
    clock: FIGfont,
    overlay: FIGfont,
}

impl FigletBanner {
    /// Load the configured fonts, falling back to the standard font
    pub fn new(fonts: &FontConfig) -> Result<Self> {
        Ok(Self {
            title: load_font(fonts.title.as_deref())?,
            clock: load_font(fonts.clock.as_deref())?,
            overlay: load_font(fonts.overlay.as_deref())?,
        })
    }

    fn font(&self, style: BannerStyle) -> &FIGfont {
        match style {
            BannerStyle::Title => &self.title,
            BannerStyle::Clock => &self.clock,
            BannerStyle::Overlay => &self.overlay,
        }
    }
}

impl Banner for FigletBanner {
    fn render(&self, text: &str, style: BannerStyle) -> String {
        match self.font(style).convert(text) {
            Some(figure) => trim_blank_tail(&figure.to_string()),
            None => text.to_string(),
        }
    }
}

fn load_font(path: Option<&Path>) -> Result<FIGfont> {
    match path {
        None => FIGfont::standard().map_err(|e| anyhow!("Failed to load standard font: {}", e)),
        Some(path) => {
            let name = path
                .to_str()
                .ok_or_else(|| anyhow!("Font path is not valid UTF-8: {}", path.display()))?;
            FIGfont::from_file(name)
                .map_err(|e| anyhow!("Failed to load font {}: {}", path.display(), e))
        }
    }
}

/// Drop trailing whitespace-only lines so the block height is tight
fn trim_blank_tail(block: &str) -> String {
    let lines: Vec<&str> = block.lines().collect();
    let keep = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(0, |i| i + 1);
    lines[..keep].join("\n")
}

/// Banner that returns the text unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainBanner;

impl Banner for PlainBanner {
    fn render(&self, text: &str, _style: BannerStyle) -> String {
        text.to_string()
    }
}
