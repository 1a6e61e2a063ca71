//! Nullable clock — deterministic time for testing.

use std::cell::Cell;
use vela_types::Timestamp;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to, so accrual windows in tests are
/// exact rather than racy.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: Cell::new(initial_secs),
        }
    }

    /// Get the current time.
    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }

    /// Advance time by `secs` and return the new current time.
    pub fn advance(&self, secs: u64) -> Timestamp {
        self.current.set(self.current.get() + secs);
        self.now()
    }

    /// Set the time to a specific value.
    pub fn set(&self, secs: u64) {
        self.current.set(secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_stands_still_until_advanced() {
        let clock = NullClock::new(100);
        assert_eq!(clock.now(), Timestamp::new(100));
        assert_eq!(clock.now(), Timestamp::new(100));
        assert_eq!(clock.advance(25), Timestamp::new(125));
        clock.set(10);
        assert_eq!(clock.now(), Timestamp::new(10));
    }
}
