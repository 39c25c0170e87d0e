//! # mailsync Domain
//!
//! Domain types shared by every mailsync crate.
//!
//! This crate contains:
//! - Lifecycle, folder, network and event types
//! - Domain error types and the `Result` alias
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other mailsync crates
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
