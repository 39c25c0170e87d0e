//! Application lifecycle types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Orchestrator-owned execution state.
///
/// Sync loops run only while the state is `Running`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationState {
    #[default]
    Stopped,
    Running,
    Background,
    /// Launched by the OS for a background fetch. No orchestrator transition
    /// enters this state; fetch launches run as `Running`.
    BackgroundFetch,
}

impl ApplicationState {
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Running => "running",
            Self::Background => "background",
            Self::BackgroundFetch => "background_fetch",
        }
    }
}

impl fmt::Display for ApplicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application status as reported by the operating system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsAppState {
    #[default]
    Active,
    Inactive,
    Background,
}

/// Handle for OS-granted background runtime.
///
/// `INVALID` stands for "no background extension is active".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BackgroundTaskId(u64);

impl BackgroundTaskId {
    pub const INVALID: Self = Self(0);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

impl fmt::Display for BackgroundTaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "bg-task-{}", self.0)
        } else {
            f.write_str("bg-task-invalid")
        }
    }
}
