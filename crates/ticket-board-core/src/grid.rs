//! Fixed-capacity grid of visible tiles plus the overflow buffer behind it.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::animation::{Completion, Phase, Point, Rgba, TileAnimation};
use crate::config::{AnimationConfig, BoardConfig};
use crate::entry::Entry;
use crate::geometry::{GridGeometry, Rect};
use crate::queue::QueueListener;

/// Everything the renderer needs to draw one tile for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileFrame {
    /// Number printed on the tile.
    pub number: u32,
    /// Tile fill.
    pub fill: Rgba,
    /// Number colour.
    pub text: Rgba,
    /// Where the tile is drawn.
    pub bounds: Rect,
    /// Animation phase, for renderers that want to style it.
    pub phase: Phase,
}

#[derive(Debug, Clone)]
struct Tile {
    entry: Entry,
    animation: TileAnimation,
    /// Removal requested while the tile was still sliding in.
    fade_pending: bool,
}

impl Tile {
    fn is_leaving(&self) -> bool {
        self.fade_pending || matches!(self.animation.phase(), Phase::FadingOut | Phase::Removed)
    }
}

/// Visible slots and overflow buffer, kept in step with the queue.
///
/// Slots are densely packed from index 0. A tile occupies its slot from the
/// moment it is placed, while it is still sliding in, until its fade-out has
/// finished.
#[derive(Debug)]
pub struct DisplayGrid {
    capacity: usize,
    geometry: GridGeometry,
    animation: AnimationConfig,
    slots: Vec<Tile>,
    buffer: VecDeque<Entry>,
    arrival: Option<Point>,
}

impl DisplayGrid {
    /// Empty grid laid out on `geometry`.
    #[must_use]
    pub fn new(config: &BoardConfig, geometry: GridGeometry) -> Self {
        Self {
            capacity: config.capacity(),
            geometry,
            animation: config.animation.clone(),
            slots: Vec::with_capacity(config.capacity()),
            buffer: VecDeque::new(),
            arrival: None,
        }
    }

    /// Number of visible slots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Occupied slots, including tiles still sliding in or fading out.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.slots.len()
    }

    /// Index the next placed tile would take.
    #[must_use]
    pub fn next_free_slot(&self) -> usize {
        self.slots.len()
    }

    /// Entries of the occupied slots in slot order.
    #[must_use]
    pub fn slot_entries(&self) -> Vec<Entry> {
        self.slots.iter().map(|tile| tile.entry).collect()
    }

    /// Buffered entries, head first.
    #[must_use]
    pub const fn buffer(&self) -> &VecDeque<Entry> {
        &self.buffer
    }

    /// Whether any tile is still moving or fading.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.slots.iter().any(|tile| tile.animation.is_animating())
    }

    /// Current layout.
    #[must_use]
    pub const fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Lay the grid out on a new display size. Sliding tiles are retargeted.
    pub fn set_geometry(&mut self, geometry: GridGeometry) {
        self.geometry = geometry;
        self.retarget_slides();
    }

    /// Start the next added tile from `origin` instead of the staging point.
    ///
    /// Used when a previewed tile has already travelled toward its slot.
    pub const fn set_arrival(&mut self, origin: Point) {
        self.arrival = Some(origin);
    }

    /// Advance every running animation by one tick.
    ///
    /// Returns whether anything visible changed.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;
        let mut faded = Vec::new();
        for (index, tile) in self.slots.iter_mut().enumerate() {
            if !tile.animation.is_animating() {
                continue;
            }
            changed = true;
            match tile.animation.tick(&self.animation) {
                Some(Completion::Arrived) if tile.fade_pending => {
                    tile.fade_pending = false;
                    tile.animation.start_fade(self.animation.fade_iterations);
                    debug!(entry = %tile.entry, slot = index, "deferred fade started");
                }
                Some(Completion::Arrived) => {
                    debug!(entry = %tile.entry, slot = index, "tile settled");
                }
                Some(Completion::Faded) => faded.push(index),
                None => {}
            }
        }
        if !faded.is_empty() {
            self.detach(&faded);
        }
        changed
    }

    /// Frames of every visible tile in slot order.
    pub fn frames(&self) -> impl Iterator<Item = TileFrame> + '_ {
        self.slots.iter().enumerate().map(|(index, tile)| {
            let origin = tile.animation.position_or(self.geometry.slot_origin(index));
            TileFrame {
                number: tile.entry.number(),
                fill: tile.animation.fill(),
                text: tile.animation.text(),
                bounds: self.geometry.tile_bounds(origin),
                phase: tile.animation.phase(),
            }
        })
    }

    fn place(&mut self, entry: Entry, start: Point) {
        let index = self.slots.len();
        let target = self.geometry.slot_origin(index);
        self.slots.push(Tile {
            entry,
            animation: TileAnimation::sliding(start, target),
            fade_pending: false,
        });
        debug!(%entry, slot = index, "tile placed");
    }

    /// Drop faded tiles, backfilling each freed slot from the buffer.
    /// `faded` is in ascending slot order.
    fn detach(&mut self, faded: &[usize]) {
        let mut shifted = 0;
        for &original in faded {
            let index = original - shifted;
            let gone = self.slots[index].entry;
            if let Some(next) = self.buffer.pop_front() {
                let start = self.geometry.staging_origin();
                let target = self.geometry.slot_origin(index);
                self.slots[index] = Tile {
                    entry: next,
                    animation: TileAnimation::sliding(start, target),
                    fade_pending: false,
                };
                debug!(%gone, %next, slot = index, "slot backfilled from buffer");
            } else {
                self.slots.remove(index);
                shifted += 1;
                debug!(%gone, slot = index, "tile detached");
            }
        }
        if shifted > 0 {
            self.retarget_slides();
        }
    }

    fn retarget_slides(&mut self) {
        for (index, tile) in self.slots.iter_mut().enumerate() {
            tile.animation.retarget(self.geometry.slot_origin(index));
        }
    }
}

impl QueueListener for DisplayGrid {
    fn on_add(&mut self, entry: Entry) {
        let start = self
            .arrival
            .take()
            .unwrap_or_else(|| self.geometry.staging_origin());
        if self.slots.len() < self.capacity {
            self.place(entry, start);
        } else {
            self.buffer.push_back(entry);
            debug!(%entry, buffered = self.buffer.len(), "grid full; entry buffered");
        }
    }

    fn on_remove(&mut self, entry: Entry) {
        if let Some(index) = self
            .slots
            .iter()
            .position(|tile| tile.entry == entry && !tile.is_leaving())
        {
            let iterations = self.animation.fade_iterations;
            let tile = &mut self.slots[index];
            if tile.animation.start_fade(iterations) {
                debug!(%entry, slot = index, "fade started");
            } else {
                tile.fade_pending = true;
                debug!(%entry, slot = index, "fade deferred until slide ends");
            }
            return;
        }
        if let Some(position) = self.buffer.iter().position(|buffered| *buffered == entry) {
            self.buffer.remove(position);
            debug!(%entry, "entry dropped from buffer");
            return;
        }
        warn!(%entry, "removed entry has no tile on the grid or in the buffer");
    }
}
