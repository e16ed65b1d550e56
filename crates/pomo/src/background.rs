//! Animated background: falling snow or matrix rain
//!
//! The buffer holds one string per terminal row, newest first. Every redraw
//! prepends a freshly sampled row and drops the oldest ones beyond the
//! terminal height. Row 0 of the buffer is drawn on terminal row 0, so new
//! rows appear at the top and older rows move down one line per frame.

use pomo_core::BackgroundMode;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// (glyph, weight) pairs for snow: overwhelmingly blank
const SNOW: &[(char, usize)] = &[
    (' ', 120),
    ('.', 3),
    ('*', 2),
    ('·', 2),
    ('+', 1),
    ('°', 1),
];

/// (glyph, weight) pairs for matrix rain: dense, with half-width katakana
/// and box-drawing glyphs that still occupy a single column
const MATRIX: &[(char, usize)] = &[
    (' ', 40),
    ('0', 2),
    ('1', 2),
    ('2', 1),
    ('3', 1),
    ('4', 1),
    ('5', 1),
    ('7', 1),
    ('8', 1),
    ('9', 1),
    ('Z', 1),
    ('#', 1),
    ('$', 1),
    ('%', 1),
    ('&', 1),
    ('+', 1),
    ('<', 1),
    ('>', 1),
    ('=', 1),
    ('*', 1),
    (':', 1),
    ('|', 1),
    ('¦', 1),
    ('│', 1),
    ('╎', 1),
    ('░', 1),
    ('▒', 1),
    ('ｦ', 1),
    ('ｱ', 1),
    ('ｳ', 1),
    ('ｴ', 1),
    ('ｵ', 1),
    ('ｶ', 1),
    ('ｷ', 1),
    ('ｹ', 1),
    ('ｺ', 1),
    ('ｻ', 1),
    ('ｼ', 1),
    ('ｽ', 1),
    ('ｾ', 1),
    ('ｿ', 1),
    ('ﾀ', 1),
    ('ﾂ', 1),
    ('ﾃ', 1),
    ('ﾅ', 1),
    ('ﾆ', 1),
    ('ﾇ', 1),
    ('ﾈ', 1),
    ('ﾊ', 1),
    ('ﾋ', 1),
    ('ﾎ', 1),
    ('ﾏ', 1),
    ('ﾐ', 1),
    ('ﾑ', 1),
    ('ﾒ', 1),
    ('ﾓ', 1),
    ('ﾔ', 1),
    ('ﾕ', 1),
    ('ﾗ', 1),
    ('ﾘ', 1),
    ('ﾜ', 1),
];

fn charset(mode: BackgroundMode) -> &'static [(char, usize)] {
    match mode {
        BackgroundMode::Snow => SNOW,
        BackgroundMode::Matrix => MATRIX,
        BackgroundMode::None => &[],
    }
}

/// Scrolling background buffer
pub struct Background<R = StdRng> {
    mode: BackgroundMode,
    /// Charset expanded by weight, so uniform sampling honours the weights
    pool: Vec<char>,
    rows: VecDeque<String>,
    rng: R,
}

impl Background<StdRng> {
    pub fn new(mode: BackgroundMode) -> Self {
        Self::with_rng(mode, StdRng::from_entropy())
    }
}

impl<R: Rng> Background<R> {
    pub fn with_rng(mode: BackgroundMode, rng: R) -> Self {
        let pool = charset(mode)
            .iter()
            .flat_map(|&(glyph, weight)| std::iter::repeat(glyph).take(weight))
            .collect();

        Self {
            mode,
            pool,
            rows: VecDeque::new(),
            rng,
        }
    }

    pub fn mode(&self) -> BackgroundMode {
        self.mode
    }

    pub fn is_enabled(&self) -> bool {
        !self.pool.is_empty()
    }

    /// Drop every row (start of a phase)
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Prepend one new row of `width` glyphs and keep at most `height` rows
    pub fn advance(&mut self, height: u16, width: u16) {
        if !self.is_enabled() {
            return;
        }

        let row: String = (0..width)
            .map(|_| *self.pool.choose(&mut self.rng).unwrap_or(&' '))
            .collect();
        self.rows.push_front(row);
        self.rows.truncate(height as usize);
    }

    /// Rows newest first; row `i` is drawn on terminal row `i`
    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
