//! # mailsync infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - Configuration loading (environment, TOML and JSON files)
//! - The host platform bridge (background tasks, app status, watch flags)
//! - Connectivity notifiers (host-pushed and TCP probe)
//!
//! ## Architecture
//! - Implements traits defined in `mailsync-core`
//! - Contains all "impure" code (I/O, sockets, OS state)

pub mod config;
pub mod errors;
pub mod platform;
pub mod reachability;

// Re-export commonly used items
pub use errors::InfraError;
pub use platform::{HostPlatform, StaticSyncSettings};
pub use reachability::{HostReachability, ProbeReachability};
