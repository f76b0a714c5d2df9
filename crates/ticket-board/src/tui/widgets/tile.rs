use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use ticket_board_core::{Rgba, TileFrame, TileStyle};

use super::super::constants::{GLYPH_HEIGHT, SHADOW_RGB};
use super::digits::{block_lines, block_width};

/// One board tile: shadow, filled body and centred number.
pub(in crate::tui) struct TileWidget<'a> {
    frame: &'a TileFrame,
    style: &'a TileStyle,
}

impl<'a> TileWidget<'a> {
    pub(in crate::tui) const fn new(frame: &'a TileFrame, style: &'a TileStyle) -> Self {
        Self { frame, style }
    }
}

impl Widget for TileWidget<'_> {
    /// `area` is the board surface the frame's coordinates are relative to.
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bounds = self.frame.bounds;
        let fill = composite(self.frame.fill, (0, 0, 0));
        let text = composite(self.frame.text, fill);

        let offset = self.style.shadow_offset;
        if offset > 0.0 {
            let shadow = scale(SHADOW_RGB, self.frame.fill.a);
            if let Some(rect) = cell_rect(bounds.x + offset, bounds.y + offset, bounds.width, bounds.height, area) {
                buf.set_style(rect, Style::default().bg(rgb(shadow)));
            }
        }

        let Some(rect) = cell_rect(bounds.x, bounds.y, bounds.width, bounds.height, area) else {
            return;
        };
        Clear.render(rect, buf);
        let border_type = if self.style.corner_radius > 0 {
            BorderType::Rounded
        } else {
            BorderType::Plain
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(Style::default().fg(rgb(text)))
            .style(Style::default().bg(rgb(fill)));
        let inner = block.inner(rect);
        block.render(rect, buf);

        let number = self.frame.number.to_string();
        let text_style = Style::default().fg(rgb(text)).add_modifier(Modifier::BOLD);
        let lines: Vec<Line<'_>> = match block_lines(&number) {
            Some(rows)
                if inner.height >= GLYPH_HEIGHT && usize::from(inner.width) >= block_width(number.len()) =>
            {
                rows.into_iter().map(Line::from).collect()
            }
            _ => vec![Line::from(number)],
        };
        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).min(inner.height);
        let top = inner.y + (inner.height - height) / 2;
        let text_area = Rect::new(inner.x, top, inner.width, height);
        Paragraph::new(lines)
            .style(text_style)
            .alignment(Alignment::Center)
            .render(text_area, buf);
    }
}

/// Cells covered by a box in board units, clipped to `area`.
pub(in crate::tui) fn cell_rect(x: f64, y: f64, width: f64, height: f64, area: Rect) -> Option<Rect> {
    let left = (f64::from(area.x) + x.round()).max(f64::from(area.left()));
    let top = (f64::from(area.y) + y.round()).max(f64::from(area.top()));
    let right = (f64::from(area.x) + (x + width).round()).min(f64::from(area.right()));
    let bottom = (f64::from(area.y) + (y + height).round()).min(f64::from(area.bottom()));
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(
        to_cell(left),
        to_cell(top),
        to_cell(right - left),
        to_cell(bottom - top),
    ))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_cell(value: f64) -> u16 {
    value.clamp(0.0, f64::from(u16::MAX)) as u16
}

/// `top` blended over an opaque `under` colour.
pub(in crate::tui) fn composite(top: Rgba, under: (u8, u8, u8)) -> (u8, u8, u8) {
    let mix = |over: u8, base: u8| {
        let alpha = u16::from(top.a);
        let value = (u16::from(over) * alpha + u16::from(base) * (255 - alpha)) / 255;
        u8::try_from(value).unwrap_or(u8::MAX)
    };
    (mix(top.r, under.0), mix(top.g, under.1), mix(top.b, under.2))
}

fn scale(colour: (u8, u8, u8), alpha: u8) -> (u8, u8, u8) {
    composite(Rgba::new(colour.0, colour.1, colour.2, alpha), (0, 0, 0))
}

const fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}
