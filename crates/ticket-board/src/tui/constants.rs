//! Shared constants for the terminal display.

/// Title set on the terminal window.
pub const WINDOW_TITLE: &str = "QueManager";
/// Rows reserved below the board for the help line.
pub const FOOTER_HEIGHT: u16 = 1;
/// Shadow colour at full tile opacity.
pub const SHADOW_RGB: (u8, u8, u8) = (48, 48, 48);
/// Rows of a block-font digit.
pub const GLYPH_HEIGHT: u16 = 5;
/// Columns of a block-font digit.
pub const GLYPH_WIDTH: u16 = 3;
