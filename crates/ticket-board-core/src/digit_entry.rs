//! The number being typed, previewed as a floating tile.

use tracing::{debug, trace};

use crate::animation::{Completion, Phase, Point, TileAnimation};
use crate::config::AnimationConfig;
use crate::entry::Entry;
use crate::geometry::GridGeometry;
use crate::grid::TileFrame;
use crate::key::KeyInput;

/// How the preview came to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryMode {
    /// Typed by hand; waits for a terminal key.
    Confirming,
    /// Pre-filled from the auto-add counter and confirmed at once.
    AutoAdding,
}

/// Lifecycle of a preview.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryState {
    /// Collecting digits.
    Accumulating,
    /// Confirmed; the preview is sliding toward its slot.
    Sliding,
    /// The slide finished and the number went to the queue.
    Confirmed,
    /// Backspaced away; nothing happens to the queue.
    Cancelled,
    /// Delete pressed; the number is to be removed from the queue.
    DeleteRequested,
}

/// Result of feeding one key to the preview.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Key filtered, or swallowed while the preview slides.
    Ignored,
    /// A digit typed on the bare board opened a new preview.
    Opened,
    /// The typed number changed.
    Updated,
    /// The slide toward the grid started.
    Confirmed,
    /// The preview was discarded.
    Cancelled,
    /// Remove this entry from the queue and close the preview.
    Delete(Entry),
}

/// Emitted once, when a confirmed preview reaches its destination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrival {
    /// Number to commit to the queue.
    pub entry: Entry,
    /// Where the preview stopped.
    pub position: Point,
}

/// Digit-entry state machine with its preview tile.
#[derive(Debug, Clone)]
pub struct DigitEntry {
    digits: String,
    max_digits: usize,
    target_slot: usize,
    mode: EntryMode,
    state: EntryState,
    origin: Point,
    destination: Point,
    animation: TileAnimation,
}

impl DigitEntry {
    /// Preview seeded with the first typed digit.
    ///
    /// `target_slot` is the slot the number will slide toward once
    /// confirmed.
    #[must_use]
    pub fn manual(first_digit: u8, max_digits: u32, target_slot: usize, geometry: &GridGeometry) -> Self {
        let digits = char::from(b'0' + first_digit.min(9)).to_string();
        Self::with_digits(digits, EntryMode::Confirming, max_digits, target_slot, geometry)
    }

    /// Preview pre-filled with `number` that is already on its way.
    #[must_use]
    pub fn auto(number: u32, max_digits: u32, target_slot: usize, geometry: &GridGeometry) -> Self {
        let mut entry = Self::with_digits(
            number.to_string(),
            EntryMode::AutoAdding,
            max_digits,
            target_slot,
            geometry,
        );
        entry.confirm();
        entry
    }

    fn with_digits(
        digits: String,
        mode: EntryMode,
        max_digits: u32,
        target_slot: usize,
        geometry: &GridGeometry,
    ) -> Self {
        Self {
            digits,
            max_digits: usize::try_from(max_digits).unwrap_or(usize::MAX),
            target_slot,
            mode,
            state: EntryState::Accumulating,
            origin: geometry.staging_origin(),
            destination: geometry.slot_origin(target_slot),
            animation: TileAnimation::idle(),
        }
    }

    /// Typed digits.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Numeric value of the typed digits.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.digits
            .bytes()
            .fold(0u32, |acc, digit| acc.saturating_mul(10).saturating_add(u32::from(digit - b'0')))
    }

    /// Entry the typed digits stand for.
    #[must_use]
    pub fn entry(&self) -> Entry {
        Entry::new(self.value())
    }

    /// Slot index captured when the preview opened.
    #[must_use]
    pub const fn target_slot(&self) -> usize {
        self.target_slot
    }

    /// How the preview was opened.
    #[must_use]
    pub const fn mode(&self) -> EntryMode {
        self.mode
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> EntryState {
        self.state
    }

    /// Whether the preview should still be shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, EntryState::Accumulating | EntryState::Sliding)
    }

    /// Whether the confirm slide is in flight.
    #[must_use]
    pub const fn is_sliding(&self) -> bool {
        matches!(self.state, EntryState::Sliding)
    }

    /// Feed one key. `auto_add` disables manual confirmation.
    pub fn handle_key(&mut self, key: KeyInput, auto_add: bool) -> KeyOutcome {
        if self.state != EntryState::Accumulating {
            trace!(?key, state = ?self.state, "key ignored by preview");
            return KeyOutcome::Ignored;
        }
        match key {
            KeyInput::Digit(digit) => self.push_digit(digit),
            KeyInput::Backspace => {
                if self.digits.len() > 1 {
                    self.digits.pop();
                    KeyOutcome::Updated
                } else {
                    self.state = EntryState::Cancelled;
                    debug!("preview cancelled");
                    KeyOutcome::Cancelled
                }
            }
            KeyInput::Delete => {
                self.state = EntryState::DeleteRequested;
                KeyOutcome::Delete(self.entry())
            }
            KeyInput::Enter if auto_add => {
                trace!("manual confirm disabled while auto-add is on");
                KeyOutcome::Ignored
            }
            KeyInput::Enter => {
                self.confirm();
                KeyOutcome::Confirmed
            }
        }
    }

    fn push_digit(&mut self, digit: u8) -> KeyOutcome {
        if digit > 9 || self.digits.len() >= self.max_digits {
            return KeyOutcome::Ignored;
        }
        let typed = char::from(b'0' + digit);
        if self.digits == "0" {
            self.digits.clear();
        }
        self.digits.push(typed);
        KeyOutcome::Updated
    }

    fn confirm(&mut self) {
        self.animation.start_slide(self.origin, self.destination);
        self.state = EntryState::Sliding;
        debug!(entry = %self.entry(), slot = self.target_slot, mode = ?self.mode, "preview confirmed");
    }

    /// Follow a display resize.
    pub fn relayout(&mut self, geometry: &GridGeometry) {
        self.origin = geometry.staging_origin();
        self.destination = geometry.slot_origin(self.target_slot);
        self.animation.retarget(self.destination);
    }

    /// Advance the confirm slide by one tick.
    pub fn tick(&mut self, config: &AnimationConfig) -> Option<Arrival> {
        if self.state != EntryState::Sliding {
            return None;
        }
        match self.animation.tick(config) {
            Some(Completion::Arrived) => {
                self.state = EntryState::Confirmed;
                Some(Arrival {
                    entry: self.entry(),
                    position: self.destination,
                })
            }
            Some(Completion::Faded) | None => None,
        }
    }

    /// Frame of the preview tile.
    #[must_use]
    pub fn frame(&self, geometry: &GridGeometry) -> TileFrame {
        let origin = self.animation.position_or(self.origin);
        TileFrame {
            number: self.value(),
            fill: self.animation.fill(),
            text: self.animation.text(),
            bounds: geometry.tile_bounds(origin),
            phase: if self.is_sliding() {
                Phase::SlidingIn
            } else {
                Phase::Idle
            },
        }
    }
}
