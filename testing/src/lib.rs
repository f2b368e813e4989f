//! # Ferry Seating Testing
//!
//! Testing utilities and helpers for the ferry seating editor.
//!
//! This crate provides:
//! - A fixed clock for deterministic timestamps
//! - The [`ReducerTest`] Given-When-Then harness
//! - Assertion helpers for effects
//! - Log capture for tests
//!
//! ## Example
//!
//! ```ignore
//! use ferry_seating_testing::{test_clock, ReducerTest};
//!
//! ReducerTest::new(LayoutEditorReducer::new())
//!     .with_env(test_env())
//!     .given_state(open_state(20))
//!     .when_action(EditorAction::SetMode(EditorMode::Edit))
//!     .then_state(|state| assert_eq!(state.mode, EditorMode::Edit))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use ferry_seating_core::environment::Clock;


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use ferry_seating_testing::mocks::FixedClock;
    /// use ferry_seating_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Test helpers
pub mod helpers {
    /// Route `tracing` output through the test harness.
    ///
    /// Safe to call from every test; only the first call installs the
    /// subscriber. Honours `RUST_LOG`.
    pub fn init_test_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::init_test_logging;
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
