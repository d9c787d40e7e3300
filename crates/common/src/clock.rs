//! Wall clock abstraction.
//!
//! Token expiry is evaluated against `Clock::now()`. Production code uses
//! [`SystemClock`]; tests inject [`mock::MockClock`] to move time forward
//! without sleeping.

use chrono::{DateTime, Utc};
use std::fmt;

/// Source of the current time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the operating system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Controllable clock for tests.
pub mod mock {
    use super::Clock;
    use chrono::{DateTime, Duration, Utc};
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Clock that only moves when told to.
    ///
    /// Stores milliseconds since the Unix epoch in an atomic so it can be
    /// shared across tasks behind an `Arc` without locking.
    #[derive(Debug)]
    pub struct MockClock {
        now_millis: AtomicI64,
    }

    impl MockClock {
        /// Create a clock frozen at `start`.
        #[must_use]
        pub fn new(start: DateTime<Utc>) -> Self {
            Self {
                now_millis: AtomicI64::new(start.timestamp_millis()),
            }
        }

        /// Create a clock frozen at the current system time.
        #[must_use]
        pub fn starting_now() -> Self {
            Self::new(Utc::now())
        }

        /// Move the clock forward (or backward, for negative durations).
        pub fn advance(&self, by: Duration) {
            self.now_millis
                .fetch_add(by.num_milliseconds(), Ordering::SeqCst);
        }

        /// Jump to an absolute instant.
        pub fn set(&self, to: DateTime<Utc>) {
            self.now_millis
                .store(to.timestamp_millis(), Ordering::SeqCst);
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> DateTime<Utc> {
            DateTime::from_timestamp_millis(self.now_millis.load(Ordering::SeqCst))
                .unwrap_or_default()
        }
    }
}
