//! Time abstractions
//!
//! Components that measure elapsed time (background budgets, probe
//! intervals) take an `Arc<dyn Clock>` so tests can drive time by hand:
//!
//! ```rust
//! use std::time::Duration;
//!
//! use mailsync_common::time::{Clock, MockClock};
//!
//! let clock = MockClock::new();
//! let start = clock.now();
//! clock.advance(Duration::from_secs(5));
//! assert_eq!(clock.now().duration_since(start), Duration::from_secs(5));
//! ```

pub mod clock;

pub use clock::{Clock, MockClock, SystemClock};
