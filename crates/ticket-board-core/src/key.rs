//! Logical key events fed to the engine.

/// Logical key events the engine understands.
///
/// Hosts decode physical keys into these; anything else never reaches the
/// engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyInput {
    /// A decimal digit, `0..=9`.
    Digit(u8),
    /// Confirm the typed number, or advance the auto-add counter when no
    /// number is being typed.
    Enter,
    /// Drop the last typed digit.
    Backspace,
    /// Remove the typed number from the queue.
    Delete,
}

impl KeyInput {
    /// `Digit` for an ASCII decimal digit, `None` for any other character.
    #[must_use]
    pub fn digit(c: char) -> Option<Self> {
        c.to_digit(10)
            .and_then(|d| u8::try_from(d).ok())
            .map(Self::Digit)
    }
}
