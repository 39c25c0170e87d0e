//! Application lifecycle orchestration
//!
//! [`Orchestrator`] owns the [`ApplicationState`](mailsync_domain::ApplicationState)
//! machine and the sync loops that run while it is `Running`:
//!
//! | call      | resulting state |
//! |-----------|-----------------|
//! | `start()` | `Running` (no-op if already running) |
//! | `stop()`  | `Background` |
//! | `close()` | `Stopped` |

pub mod error;
pub mod events;
pub mod orchestrator;
pub mod state;

pub use error::LifecycleError;
pub use events::EventBus;
pub use orchestrator::{Orchestrator, OrchestratorOptions, OrchestratorPorts};
pub use state::SharedAppState;
