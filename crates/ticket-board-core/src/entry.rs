//! Ticket numbers held by the queue.

use std::fmt;

/// A ticket number waiting in the queue.
///
/// Two entries carrying the same number are interchangeable: equality and
/// hashing only look at `number`.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Entry {
    number: u32,
}

impl Entry {
    /// Wrap a ticket number.
    #[must_use]
    pub const fn new(number: u32) -> Self {
        Self { number }
    }

    /// The ticket number.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.number
    }
}

impl From<u32> for Entry {
    fn from(number: u32) -> Self {
        Self::new(number)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.number.fmt(f)
    }
}
