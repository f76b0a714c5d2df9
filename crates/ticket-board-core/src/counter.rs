//! Sequential number source for auto-add mode.

/// Source of sequential ticket numbers for auto-add mode.
///
/// Counts up forever and hands out the count modulo `10^max_digits`, so the
/// numbers wrap at the digit-count boundary.
#[derive(Debug, Clone)]
pub struct AutoAdvanceCounter {
    count: u64,
    modulus: u64,
}

impl AutoAdvanceCounter {
    /// Counter whose first number is `start` (reduced into range).
    #[must_use]
    pub fn new(start: u32, number_space: u32) -> Self {
        Self {
            count: u64::from(start),
            modulus: u64::from(number_space.max(1)),
        }
    }

    /// Next ticket number.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u32 {
        let value = self.count % self.modulus;
        self.count = self.count.wrapping_add(1);
        u32::try_from(value).unwrap_or_default()
    }

    /// Number the following call to [`next`](Self::next) returns.
    #[must_use]
    pub fn peek(&self) -> u32 {
        u32::try_from(self.count % self.modulus).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_two_digit_space() {
        let mut counter = AutoAdvanceCounter::new(0, 100);
        let first: Vec<u32> = (0..100).map(|_| counter.next()).collect();
        assert_eq!(first, (0..100).collect::<Vec<_>>());
        assert_eq!(counter.next(), 0);
        assert_eq!(counter.next(), 1);
    }

    #[test]
    fn start_value_is_honoured_and_reduced() {
        let mut counter = AutoAdvanceCounter::new(98, 100);
        assert_eq!(counter.next(), 98);
        assert_eq!(counter.next(), 99);
        assert_eq!(counter.next(), 0);

        let counter = AutoAdvanceCounter::new(250, 100);
        assert_eq!(counter.peek(), 50);
    }
}
