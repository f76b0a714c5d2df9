//! Application context wiring the queue, the grid and the typed preview.

use std::cell::{Ref, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{debug, info, trace};

use crate::config::BoardConfig;
use crate::counter::AutoAdvanceCounter;
use crate::digit_entry::{Arrival, DigitEntry, KeyOutcome};
use crate::entry::Entry;
use crate::error::ConfigError;
use crate::geometry::GridGeometry;
use crate::grid::{DisplayGrid, TileFrame};
use crate::key::KeyInput;
use crate::queue::{ListenerId, ObservableQueue};

/// The whole board: one queue, one grid listening to it, at most one preview.
///
/// Owned by a single host thread. The host feeds keys through
/// [`handle_key`](Self::handle_key), calls [`tick`](Self::tick) on its timer,
/// and draws [`frames`](Self::frames) whenever [`take_dirty`](Self::take_dirty)
/// reports a change.
#[derive(Debug)]
pub struct Board {
    config: BoardConfig,
    geometry: GridGeometry,
    queue: ObservableQueue,
    grid: Rc<RefCell<DisplayGrid>>,
    grid_listener: ListenerId,
    preview: Option<DigitEntry>,
    counter: AutoAdvanceCounter,
    dirty: bool,
}

impl Board {
    /// Build a board for a `width` x `height` display.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when `config` fails validation.
    pub fn init(config: BoardConfig, width: f64, height: f64) -> Result<Self, ConfigError> {
        config.validate()?;
        let geometry = GridGeometry::new(width, height, &config);
        let grid = Rc::new(RefCell::new(DisplayGrid::new(&config, geometry)));
        let mut queue = ObservableQueue::new();
        let grid_listener = queue.add_listener(&grid);
        let counter = AutoAdvanceCounter::new(config.auto_start, config.number_space());
        info!(
            columns = config.columns,
            rows = config.rows,
            max_digits = config.max_digits,
            auto_add = config.auto_add,
            "board initialised"
        );
        Ok(Self {
            config,
            geometry,
            queue,
            grid,
            grid_listener,
            preview: None,
            counter,
            dirty: true,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Append `number` to the queue. The grid reacts through its listener.
    pub fn add(&mut self, number: u32) -> bool {
        self.dirty = true;
        self.queue.add(Entry::new(number))
    }

    /// Remove the first occurrence of `number`. `false` when it was absent.
    pub fn remove(&mut self, number: u32) -> bool {
        let removed = self.queue.remove(Entry::new(number));
        self.dirty |= removed;
        removed
    }

    /// Next number from the auto-add counter.
    pub fn auto_next(&mut self) -> u32 {
        self.counter.next()
    }

    /// Whether the advance key supplies numbers automatically.
    #[must_use]
    pub const fn auto_add_enabled(&self) -> bool {
        self.config.auto_add
    }

    /// Switch auto-add mode on or off.
    pub fn set_auto_add(&mut self, enabled: bool) {
        if self.config.auto_add != enabled {
            info!(enabled, "auto-add toggled");
        }
        self.config.auto_add = enabled;
    }

    /// Feed one logical key to the board.
    ///
    /// With a preview open the key goes to it. Otherwise a digit opens a new
    /// preview and, under auto-add, Enter advances the counter.
    pub fn handle_key(&mut self, key: KeyInput) -> KeyOutcome {
        let auto_add = self.config.auto_add;
        if let Some(preview) = self.preview.as_mut() {
            let outcome = preview.handle_key(key, auto_add);
            match outcome {
                KeyOutcome::Ignored => {}
                KeyOutcome::Opened | KeyOutcome::Updated | KeyOutcome::Confirmed => {
                    self.dirty = true;
                }
                KeyOutcome::Cancelled => self.close_preview(),
                KeyOutcome::Delete(entry) => {
                    self.close_preview();
                    if !self.queue.remove(entry) {
                        debug!(%entry, "delete requested for a number not in the queue");
                    }
                }
            }
            return outcome;
        }

        match key {
            KeyInput::Digit(digit) => {
                let slot = self.grid.borrow().next_free_slot();
                self.preview = Some(DigitEntry::manual(
                    digit,
                    self.config.max_digits,
                    slot,
                    &self.geometry,
                ));
                self.dirty = true;
                KeyOutcome::Opened
            }
            KeyInput::Enter if auto_add => {
                if self.advance() {
                    KeyOutcome::Confirmed
                } else {
                    KeyOutcome::Ignored
                }
            }
            KeyInput::Enter | KeyInput::Backspace | KeyInput::Delete => KeyOutcome::Ignored,
        }
    }

    /// Launch the next auto-add number toward the grid.
    ///
    /// Does nothing unless auto-add is on, or while a preview is open.
    pub fn advance(&mut self) -> bool {
        if !self.config.auto_add {
            trace!("advance ignored: auto-add is off");
            return false;
        }
        if self.preview.is_some() {
            return false;
        }
        let number = self.counter.next();
        let slot = self.grid.borrow().next_free_slot();
        debug!(number, slot, "auto-add advance");
        self.preview = Some(DigitEntry::auto(
            number,
            self.config.max_digits,
            slot,
            &self.geometry,
        ));
        self.dirty = true;
        true
    }

    /// Advance every animation by one tick.
    ///
    /// A preview that reaches its slot is committed to the queue here, so
    /// the queue only learns about a number after its slide has finished.
    pub fn tick(&mut self) -> bool {
        let mut changed = self.grid.borrow_mut().tick();
        let mut arrival = None;
        if let Some(preview) = self.preview.as_mut() {
            changed |= preview.is_sliding();
            arrival = preview.tick(&self.config.animation);
        }
        if let Some(arrival) = arrival {
            self.preview = None;
            self.commit(arrival);
            changed = true;
        }
        self.dirty |= changed;
        changed
    }

    fn commit(&mut self, arrival: Arrival) {
        self.grid.borrow_mut().set_arrival(arrival.position);
        self.queue.add(arrival.entry);
    }

    fn close_preview(&mut self) {
        self.preview = None;
        self.dirty = true;
    }

    /// Lay everything out again for a new display size.
    pub fn resize(&mut self, width: f64, height: f64) {
        let geometry = GridGeometry::new(width, height, &self.config);
        if geometry == self.geometry {
            return;
        }
        self.geometry = geometry;
        self.grid.borrow_mut().set_geometry(geometry);
        if let Some(preview) = self.preview.as_mut() {
            preview.relayout(&geometry);
        }
        self.dirty = true;
    }

    /// Frames to draw, bottom first: grid tiles, then the preview.
    #[must_use]
    pub fn frames(&self) -> Vec<TileFrame> {
        let mut frames: Vec<TileFrame> = self.grid.borrow().frames().collect();
        if let Some(preview) = &self.preview {
            frames.push(preview.frame(&self.geometry));
        }
        frames
    }

    /// Current layout.
    #[must_use]
    pub const fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// The open preview, if any.
    #[must_use]
    pub const fn preview(&self) -> Option<&DigitEntry> {
        self.preview.as_ref()
    }

    /// Whether a preview is open.
    #[must_use]
    pub const fn has_preview(&self) -> bool {
        self.preview.is_some()
    }

    /// Whether anything is still moving, fading or sliding.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.grid.borrow().is_animating()
            || self.preview.as_ref().is_some_and(DigitEntry::is_sliding)
    }

    /// Report and clear the redraw flag.
    pub const fn take_dirty(&mut self) -> bool {
        let dirty = self.dirty;
        self.dirty = false;
        dirty
    }

    /// The queue of record.
    #[must_use]
    pub const fn queue(&self) -> &ObservableQueue {
        &self.queue
    }

    /// Borrow the display grid.
    #[must_use]
    pub fn grid(&self) -> Ref<'_, DisplayGrid> {
        self.grid.borrow()
    }

    /// Entries of occupied slots in slot order.
    #[must_use]
    pub fn slot_entries(&self) -> Vec<Entry> {
        self.grid.borrow().slot_entries()
    }

    /// Buffered entries, head first.
    #[must_use]
    pub fn buffered(&self) -> VecDeque<Entry> {
        self.grid.borrow().buffer().clone()
    }
}

impl Drop for Board {
    fn drop(&mut self) {
        self.queue.remove_listener(self.grid_listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(config: BoardConfig) -> Board {
        Board::init(config, 100.0, 40.0).unwrap_or_else(|err| panic!("init failed: {err}"))
    }

    fn settle(board: &mut Board) {
        for _ in 0..10_000 {
            if !board.tick() {
                return;
            }
        }
        panic!("board never settled");
    }

    fn numbers(entries: impl IntoIterator<Item = Entry>) -> Vec<u32> {
        entries.into_iter().map(Entry::number).collect()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = BoardConfig {
            rows: 0,
            ..BoardConfig::default()
        };
        assert_eq!(
            Board::init(config, 100.0, 40.0).err(),
            Some(ConfigError::EmptyGrid { field: "rows" })
        );
    }

    #[test]
    fn typed_number_reaches_queue_only_after_slide() {
        let mut board = board(BoardConfig::default());
        assert_eq!(board.handle_key(KeyInput::Digit(4)), KeyOutcome::Opened);
        assert_eq!(board.handle_key(KeyInput::Digit(2)), KeyOutcome::Updated);
        assert_eq!(board.handle_key(KeyInput::Enter), KeyOutcome::Confirmed);
        assert!(board.queue().is_empty());
        assert!(board.has_preview());

        settle(&mut board);
        assert!(!board.has_preview());
        assert_eq!(numbers(board.queue().entries().iter().copied()), vec![42]);
        assert_eq!(numbers(board.slot_entries()), vec![42]);
    }

    #[test]
    fn committed_tile_starts_where_preview_landed() {
        let mut board = board(BoardConfig::default());
        board.handle_key(KeyInput::Digit(1));
        board.handle_key(KeyInput::Enter);
        let mut committed = false;
        for _ in 0..10_000 {
            board.tick();
            if !board.queue().is_empty() {
                committed = true;
                break;
            }
        }
        assert!(committed);
        let frames = board.frames();
        let slot = board.geometry().slot_origin(0);
        assert_eq!((frames[0].bounds.x, frames[0].bounds.y), (slot.x, slot.y));
    }

    #[test]
    fn delete_key_removes_typed_number() {
        let mut board = board(BoardConfig::default());
        board.add(7);
        board.add(8);
        settle(&mut board);

        board.handle_key(KeyInput::Digit(7));
        assert_eq!(
            board.handle_key(KeyInput::Delete),
            KeyOutcome::Delete(Entry::new(7))
        );
        assert!(!board.has_preview());
        assert_eq!(numbers(board.queue().entries().iter().copied()), vec![8]);
        settle(&mut board);
        assert_eq!(numbers(board.slot_entries()), vec![8]);
    }

    #[test]
    fn deleting_absent_number_changes_nothing() {
        let mut board = board(BoardConfig::default());
        board.add(3);
        settle(&mut board);
        board.handle_key(KeyInput::Digit(9));
        board.handle_key(KeyInput::Delete);
        settle(&mut board);
        assert_eq!(numbers(board.queue().entries().iter().copied()), vec![3]);
        assert_eq!(numbers(board.slot_entries()), vec![3]);
    }

    #[test]
    fn backspace_on_last_digit_closes_preview() {
        let mut board = board(BoardConfig::default());
        board.handle_key(KeyInput::Digit(5));
        assert_eq!(board.handle_key(KeyInput::Backspace), KeyOutcome::Cancelled);
        assert!(!board.has_preview());
        assert!(board.queue().is_empty());
    }

    #[test]
    fn stray_keys_without_preview_are_ignored() {
        let mut board = board(BoardConfig::default());
        assert_eq!(board.handle_key(KeyInput::Enter), KeyOutcome::Ignored);
        assert_eq!(board.handle_key(KeyInput::Backspace), KeyOutcome::Ignored);
        assert_eq!(board.handle_key(KeyInput::Delete), KeyOutcome::Ignored);
        assert!(!board.has_preview());
    }

    #[test]
    fn auto_add_advances_counter_and_blocks_mid_slide() {
        let mut board = board(BoardConfig {
            auto_add: true,
            ..BoardConfig::default()
        });
        assert_eq!(board.handle_key(KeyInput::Enter), KeyOutcome::Confirmed);
        assert_eq!(board.handle_key(KeyInput::Enter), KeyOutcome::Ignored);
        assert_eq!(board.handle_key(KeyInput::Digit(3)), KeyOutcome::Ignored);
        settle(&mut board);
        board.handle_key(KeyInput::Enter);
        settle(&mut board);
        assert_eq!(numbers(board.queue().entries().iter().copied()), vec![0, 1]);
    }

    #[test]
    fn manual_enter_is_disabled_under_auto_add() {
        let mut board = board(BoardConfig {
            auto_add: true,
            ..BoardConfig::default()
        });
        board.handle_key(KeyInput::Digit(6));
        assert_eq!(board.handle_key(KeyInput::Enter), KeyOutcome::Ignored);
        assert!(board.has_preview());
        assert!(board.queue().is_empty());
    }

    #[test]
    fn toggling_auto_add_switches_enter_behaviour() {
        let mut board = board(BoardConfig::default());
        assert!(!board.auto_add_enabled());
        board.set_auto_add(true);
        assert_eq!(board.handle_key(KeyInput::Enter), KeyOutcome::Confirmed);
        settle(&mut board);
        board.set_auto_add(false);
        assert_eq!(board.handle_key(KeyInput::Enter), KeyOutcome::Ignored);
        assert_eq!(numbers(board.queue().entries().iter().copied()), vec![0]);
    }

    #[test]
    fn advance_needs_auto_add() {
        let mut board = board(BoardConfig::default());
        assert!(!board.advance());
        assert!(!board.has_preview());
        settle(&mut board);
        assert!(board.queue().is_empty());

        board.set_auto_add(true);
        assert!(board.advance());
        settle(&mut board);
        board.set_auto_add(false);
        assert!(!board.advance());
        settle(&mut board);
        assert_eq!(numbers(board.queue().entries().iter().copied()), vec![0]);
    }

    #[test]
    fn debug_output_names_the_queue() {
        let mut board = board(BoardConfig::default());
        board.add(4);
        let text = format!("{board:?}");
        assert!(text.contains("ObservableQueue"), "{text}");
        assert!(text.contains("ListenerRegistry"), "{text}");
    }

    #[test]
    fn resize_moves_settled_tiles_with_layout() {
        let mut board = board(BoardConfig::default());
        board.add(1);
        settle(&mut board);
        board.resize(50.0, 20.0);
        settle(&mut board);
        let frame = board.frames()[0];
        let slot = board.geometry().slot_origin(0);
        assert_eq!((frame.bounds.x, frame.bounds.y), (slot.x, slot.y));
        assert_eq!(frame.bounds.width, 8.0);
    }

    #[test]
    fn dirty_flag_tracks_changes() {
        let mut board = board(BoardConfig::default());
        assert!(board.take_dirty());
        assert!(!board.take_dirty());
        assert!(!board.remove(1));
        assert!(!board.take_dirty());
        board.add(1);
        assert!(board.take_dirty());
    }
}
