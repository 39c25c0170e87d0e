//! Events the core publishes to the UI layer

use serde::{Deserialize, Serialize};

use super::lifecycle::ApplicationState;
use super::network::NetworkState;

/// Typed lifecycle notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// Connectivity changed; payload is `"online"` or `"offline"`.
    StateChanged { state: NetworkState },
    /// The orchestrator moved between execution states.
    ApplicationStateChanged { from: ApplicationState, to: ApplicationState },
}

impl LifecycleEvent {
    pub fn online() -> Self {
        Self::StateChanged { state: NetworkState::Online }
    }

    pub fn offline() -> Self {
        Self::StateChanged { state: NetworkState::Offline }
    }
}
