//! Host platform adapters
//!
//! The native shell pushes OS state into these types; the core reads it
//! back through its platform ports.

pub mod host;
pub mod settings;

pub use host::HostPlatform;
pub use settings::StaticSyncSettings;
