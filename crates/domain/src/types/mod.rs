//! Domain types and models

pub mod events;
pub mod folder;
pub mod lifecycle;
pub mod network;

pub use events::LifecycleEvent;
pub use folder::{FolderKind, LoopFamily};
pub use lifecycle::{ApplicationState, BackgroundTaskId, OsAppState};
pub use network::{Connection, NetworkState, Reachability};
