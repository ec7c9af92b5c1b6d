//! Fixed clock returning a preset instant.

use chrono::{DateTime, Utc};

use crate::ports::clock::Clock;

/// Clock frozen at a single instant, for deterministic stamps in tests.
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Creates a clock frozen at `instant`.
    #[must_use]
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
