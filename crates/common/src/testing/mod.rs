//! Testing utilities and helpers
//!
//! - **[`async_utils`]**: a polling helper that respects tokio's
//!   paused clock, so it works in `start_paused` tests as well as real-time
//!   ones
//!
//! Time mocking lives in [`crate::time`] and is re-exported here.

pub mod async_utils;

pub use async_utils::poll_until;

pub use crate::time::{Clock, MockClock, SystemClock};
