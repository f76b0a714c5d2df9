//! Slot and staging positions derived from the display size.

use serde::{Deserialize, Serialize};

use crate::animation::Point;
use crate::config::BoardConfig;

/// Axis-aligned box in display units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Maps slot indices to screen positions for a given display size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    width: f64,
    height: f64,
    columns: usize,
    rows: usize,
    margin: f64,
}

impl GridGeometry {
    /// Geometry of a `width` x `height` display laid out per `config`.
    #[must_use]
    pub const fn new(width: f64, height: f64, config: &BoardConfig) -> Self {
        Self {
            width,
            height,
            columns: config.columns,
            rows: config.rows,
            margin: config.tile.margin,
        }
    }

    /// Display width.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Display height.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    #[allow(clippy::cast_precision_loss)]
    fn cell_size(&self) -> (f64, f64) {
        (
            self.width / self.columns.max(1) as f64,
            self.height / self.rows.max(1) as f64,
        )
    }

    /// Width and height of a tile: its cell minus the margin on both sides.
    #[must_use]
    pub fn tile_size(&self) -> (f64, f64) {
        let (cell_w, cell_h) = self.cell_size();
        (
            (cell_w - 2.0 * self.margin).max(0.0),
            (cell_h - 2.0 * self.margin).max(0.0),
        )
    }

    /// Top-left corner of the tile in slot `index`.
    ///
    /// Indices past the last slot map one row below the grid, off screen.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn slot_origin(&self, index: usize) -> Point {
        let columns = self.columns.max(1);
        let column = index % columns;
        let row = (index / columns).min(self.rows);
        let (cell_w, cell_h) = self.cell_size();
        Point::new(
            column as f64 * cell_w + self.margin,
            row as f64 * cell_h + self.margin,
        )
    }

    /// Top-left corner of a tile centred on the display.
    #[must_use]
    pub fn staging_origin(&self) -> Point {
        let (tile_w, tile_h) = self.tile_size();
        Point::new((self.width - tile_w) / 2.0, (self.height - tile_h) / 2.0)
    }

    /// Bounding box of a tile whose top-left corner is `origin`.
    #[must_use]
    pub fn tile_bounds(&self, origin: Point) -> Rect {
        let (width, height) = self.tile_size();
        Rect {
            x: origin.x,
            y: origin.y,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> GridGeometry {
        GridGeometry::new(100.0, 40.0, &BoardConfig::default())
    }

    #[test]
    fn tiles_fill_cells_minus_margin() {
        assert_eq!(geometry().tile_size(), (18.0, 8.0));
    }

    #[test]
    fn slots_run_left_to_right_then_down() {
        let geometry = geometry();
        assert_eq!(geometry.slot_origin(0), Point::new(1.0, 1.0));
        assert_eq!(geometry.slot_origin(4), Point::new(81.0, 1.0));
        assert_eq!(geometry.slot_origin(5), Point::new(1.0, 11.0));
        assert_eq!(geometry.slot_origin(19), Point::new(81.0, 31.0));
    }

    #[test]
    fn overflow_slots_sit_below_the_grid() {
        let geometry = geometry();
        assert_eq!(geometry.slot_origin(20), Point::new(1.0, 41.0));
        assert_eq!(geometry.slot_origin(47), Point::new(41.0, 41.0));
    }

    #[test]
    fn staging_origin_centres_a_tile() {
        assert_eq!(geometry().staging_origin(), Point::new(41.0, 16.0));
    }
}
