use super::super::constants::{GLYPH_HEIGHT, GLYPH_WIDTH};

const GLYPHS: [[&str; 5]; 10] = [
    ["███", "█ █", "█ █", "█ █", "███"],
    [" █ ", "██ ", " █ ", " █ ", "███"],
    ["███", "  █", "███", "█  ", "███"],
    ["███", "  █", "███", "  █", "███"],
    ["█ █", "█ █", "███", "  █", "  █"],
    ["███", "█  ", "███", "  █", "███"],
    ["███", "█  ", "███", "█ █", "███"],
    ["███", "  █", "  █", "  █", "  █"],
    ["███", "█ █", "███", "█ █", "███"],
    ["███", "█ █", "███", "  █", "███"],
];

/// Columns taken by `len` block digits separated by one blank column.
pub(in crate::tui) fn block_width(len: usize) -> usize {
    (len * (usize::from(GLYPH_WIDTH) + 1)).saturating_sub(1)
}

/// Rows of `text` in the block font, or `None` if it holds a non-digit.
pub(in crate::tui) fn block_lines(text: &str) -> Option<Vec<String>> {
    let glyphs = text
        .chars()
        .map(|c| {
            c.to_digit(10)
                .and_then(|d| usize::try_from(d).ok())
                .and_then(|d| GLYPHS.get(d))
        })
        .collect::<Option<Vec<_>>>()?;
    let lines = (0..usize::from(GLYPH_HEIGHT))
        .map(|row| {
            glyphs
                .iter()
                .map(|glyph| glyph[row])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    Some(lines)
}
