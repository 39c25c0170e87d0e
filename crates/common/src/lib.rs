//! Common utilities shared across mailsync crates.
//!
//! # Feature Tiers
//!
//! - default: clock abstractions ([`time`])
//! - `runtime`: async helpers built on tokio ([`testing`])
//! - `test-utils`: everything tests in downstream crates need

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "runtime", feature = "test-utils", test))]
pub mod testing;

pub use time::{Clock, MockClock, SystemClock};
