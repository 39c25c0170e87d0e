//! Operating system boundary: background runtime, app status and settings

pub mod ports;

pub use ports::{AppStatusProvider, BackgroundTasks, PlatformPort, SyncSettings};
