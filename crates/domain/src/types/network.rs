//! Network reachability types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw connection type reported by a reachability source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connection {
    Wifi,
    Cellular,
    None,
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Wifi => "wifi",
            Self::Cellular => "cellular",
            Self::None => "none",
        })
    }
}

/// Connection collapsed to what orchestration cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reachability {
    Reachable(Connection),
    Unreachable,
}

impl Reachability {
    pub fn is_reachable(self) -> bool {
        matches!(self, Self::Reachable(_))
    }

    pub fn network_state(self) -> NetworkState {
        if self.is_reachable() {
            NetworkState::Online
        } else {
            NetworkState::Offline
        }
    }
}

impl From<Connection> for Reachability {
    fn from(connection: Connection) -> Self {
        match connection {
            Connection::Wifi | Connection::Cellular => Self::Reachable(connection),
            Connection::None => Self::Unreachable,
        }
    }
}

/// Payload of the state-changed notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkState {
    Online,
    Offline,
}

impl NetworkState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for NetworkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
