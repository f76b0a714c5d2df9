//! Headless host: drive the engine from a key script and report the result.

use std::fmt;

use anyhow::{Result, bail};
use thiserror::Error;
use tracing::debug;

use ticket_board_core::{Board, BoardConfig, Entry, KeyInput};

/// Ticks allowed for one step to settle before giving up.
const SETTLE_TICK_LIMIT: usize = 100_000;

/// One step of a key script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayStep {
    /// A key fed through the engine's key handler.
    Key(KeyInput),
    /// The auto-add advance path.
    Advance,
}

/// Unsupported character in a key script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected '{found}' at position {position} in key script (expected 0-9, '+', '<', 'x' or '>')")]
pub struct ScriptError {
    /// Character offset of the offending character.
    pub position: usize,
    /// The offending character.
    pub found: char,
}

/// Parse a key script.
///
/// Digits type themselves, `+` is Enter, `<` is Backspace, `x` is Delete and
/// `>` launches the next auto-add number. Whitespace is ignored.
pub fn parse_script(script: &str) -> Result<Vec<ReplayStep>, ScriptError> {
    script
        .chars()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(position, c)| match c {
            '+' => Ok(ReplayStep::Key(KeyInput::Enter)),
            '<' => Ok(ReplayStep::Key(KeyInput::Backspace)),
            'x' => Ok(ReplayStep::Key(KeyInput::Delete)),
            '>' => Ok(ReplayStep::Advance),
            c => KeyInput::digit(c)
                .map(ReplayStep::Key)
                .ok_or(ScriptError { position, found: c }),
        })
        .collect()
}

/// Final state of a replayed board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    /// Entries of occupied slots in slot order.
    pub slots: Vec<u32>,
    /// Overflow buffer, head first.
    pub buffer: Vec<u32>,
    /// The queue of record.
    pub queue: Vec<u32>,
    /// Digits still sitting in an open preview.
    pub pending: Option<String>,
}

impl ReplayReport {
    fn capture(board: &Board) -> Self {
        Self {
            slots: board.slot_entries().into_iter().map(Entry::number).collect(),
            buffer: board.buffered().into_iter().map(Entry::number).collect(),
            queue: board.queue().entries().iter().copied().map(Entry::number).collect(),
            pending: board.preview().map(|preview| preview.digits().to_owned()),
        }
    }
}

fn join(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "slots:  {}", join(&self.slots))?;
        writeln!(f, "buffer: {}", join(&self.buffer))?;
        write!(f, "queue:  {}", join(&self.queue))?;
        if let Some(pending) = &self.pending {
            write!(f, "\ntyping: {pending}")?;
        }
        Ok(())
    }
}

/// Feed `steps` through a fresh board, settling every animation after each.
pub fn replay(config: BoardConfig, width: u16, height: u16, steps: &[ReplayStep]) -> Result<ReplayReport> {
    let mut board = Board::init(config, f64::from(width), f64::from(height))?;
    for step in steps {
        match *step {
            ReplayStep::Key(key) => {
                let outcome = board.handle_key(key);
                debug!(?key, ?outcome, "replayed key");
            }
            ReplayStep::Advance => {
                let launched = board.advance();
                debug!(launched, "replayed advance");
            }
        }
        settle(&mut board)?;
    }
    Ok(ReplayReport::capture(&board))
}

fn settle(board: &mut Board) -> Result<()> {
    for _ in 0..SETTLE_TICK_LIMIT {
        if !board.is_animating() {
            return Ok(());
        }
        board.tick();
    }
    bail!("animations did not settle within {SETTLE_TICK_LIMIT} ticks")
}
