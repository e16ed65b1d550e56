//! Placement of multi-line glyph blocks on the terminal
//!
//! A block is any multi-line string: a FIGlet banner, a line of plain text,
//! the background. Its height is the number of lines and its width the
//! longest line. Placement only computes the top-left corner; clipping to
//! the terminal happens when the block is drawn.

/// Named screen position for a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Center,
    TopLeft,
    TopRight,
    TopCenter,
}

/// Size of a block as (height, width)
pub fn block_size(block: &str) -> (usize, usize) {
    let height = block.lines().count();
    let width = block
        .lines()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    (height, width)
}

/// Resolve the start (row, col) of `block` for `anchor` in a terminal of
/// `height` x `width`, then apply the offsets.
///
/// Never returns a negative position: oversized blocks and negative offsets
/// saturate at row/column 0.
pub fn place(
    block: &str,
    anchor: Anchor,
    height: u16,
    width: u16,
    offset_y: i32,
    offset_x: i32,
) -> (u16, u16) {
    let (h, w) = block_size(block);
    let (term_h, term_w) = (height as i64, width as i64);
    let (h, w) = (h as i64, w as i64);

    let (row, col) = match anchor {
        Anchor::Center => (((term_h - h) / 2).max(0), ((term_w - w) / 2).max(0)),
        Anchor::TopLeft => (0, 0),
        Anchor::TopRight => (0, (term_w - w).max(0)),
        Anchor::TopCenter => (0, ((term_w - w) / 2).max(0)),
    };

    (
        clamp_u16(row + offset_y as i64),
        clamp_u16(col + offset_x as i64),
    )
}

fn clamp_u16(value: i64) -> u16 {
    value.clamp(0, u16::MAX as i64) as u16
}
