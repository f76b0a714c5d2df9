//! Display engine for an animated ticket-number board.
//!
//! An [`ObservableQueue`] of ticket numbers is the record of truth. A
//! [`DisplayGrid`] listens to it and keeps a fixed number of animated tiles on
//! screen, buffering the overflow. A [`DigitEntry`] preview collects typed
//! numbers and only commits them once their slide has finished. [`Board`]
//! wires the three together for a host that supplies keys, ticks and a
//! surface to draw [`TileFrame`]s on.

/// Per-tile slide and fade state machine.
pub mod animation;
/// Application context.
pub mod board;
/// Engine configuration.
pub mod config;
/// Auto-add number source.
pub mod counter;
/// Typed-number preview.
pub mod digit_entry;
/// Ticket numbers.
pub mod entry;
/// Error types.
pub mod error;
/// Slot layout.
pub mod geometry;
/// Visible tiles and overflow buffer.
pub mod grid;
/// Logical key events.
pub mod key;
/// Observable queue and listener registry.
pub mod queue;

pub use animation::{Completion, Phase, Point, Rgba, TileAnimation};
pub use board::Board;
pub use config::{AnimationConfig, BoardConfig, MAX_SUPPORTED_DIGITS, TileStyle};
pub use counter::AutoAdvanceCounter;
pub use digit_entry::{Arrival, DigitEntry, EntryMode, EntryState, KeyOutcome};
pub use entry::Entry;
pub use error::ConfigError;
pub use geometry::{GridGeometry, Rect};
pub use grid::{DisplayGrid, TileFrame};
pub use key::KeyInput;
pub use queue::{ListenerId, ListenerRegistry, ObservableQueue, QueueListener};
