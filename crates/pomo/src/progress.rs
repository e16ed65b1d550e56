//! Single-line progress bar

/// Glyph for the elapsed part of the bar
pub const FILLED: char = '█';
/// Glyph for the remaining part of the bar
pub const EMPTY: char = '_';

/// Column the bar is drawn at on the last terminal row
pub const BAR_COLUMN: u16 = 2;

/// Columns used by the brackets, the gap before the label and the margins
const OVERHEAD: usize = 6;

/// Render a bar for `proportion` (clamped to 0..=1) followed by `label`,
/// sized to fill a terminal `width` columns wide.
///
/// A terminal too narrow for the overhead gets an empty bar, not an error.
pub fn render(proportion: f64, label: &str, width: u16) -> String {
    let bar_width = (width as usize).saturating_sub(OVERHEAD + label.chars().count());
    let proportion = if proportion.is_nan() {
        0.0
    } else {
        proportion.clamp(0.0, 1.0)
    };
    let filled = ((proportion * bar_width as f64).floor() as usize).min(bar_width);

    let mut bar = String::with_capacity(bar_width * 3 + label.len() + 3);
    bar.push('[');
    bar.extend(std::iter::repeat(FILLED).take(filled));
    bar.extend(std::iter::repeat(EMPTY).take(bar_width - filled));
    bar.push_str("] ");
    bar.push_str(label);
    bar
}
