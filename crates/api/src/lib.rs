//! # mailsync app
//!
//! Application layer linked into the native shell.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - The OS lifecycle delegate
//! - Tracing setup
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - The native layer supplies the mail engine factory

pub mod context;
pub mod delegate;
pub mod utils;

// Re-export for convenience
pub use context::{AppContext, Connectivity};
pub use delegate::AppDelegate;
pub use utils::logging::{init_tracing, LogFormat};
