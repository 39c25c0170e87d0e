//! Application configuration structures
//!
//! Loaded by `mailsync-infra::config`; every section has defaults so a
//! partial file is enough.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    BACKGROUND_POLL_INTERVAL_SECS, BACKGROUND_SAFETY_THRESHOLD_SECS, DATABASE_FILE_NAME,
    DEFAULT_BACKGROUND_BUDGET_SECS, DEFAULT_ENGINE_LABEL, PROBE_INTERVAL_SECS, PROBE_TIMEOUT_MS,
};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub sync: SyncConfig,
    pub background: BackgroundConfig,
    pub reachability: ReachabilityConfig,
    /// Label handed to the mail engine on creation.
    pub engine_label: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            sync: SyncConfig::default(),
            background: BackgroundConfig::default(),
            reachability: ReachabilityConfig::default(),
            engine_label: DEFAULT_ENGINE_LABEL.to_string(),
        }
    }
}

/// Where the engine keeps its database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub database_file: String,
}

impl StorageConfig {
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from("."), database_file: DATABASE_FILE_NAME.to_string() }
    }
}

/// Which optional folders get their own sync loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub watch_sentbox: bool,
    pub watch_mvbox: bool,
}

/// Background budget policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Delay between two budget checks.
    pub poll_interval_secs: u64,
    /// Stop syncing once less than this much background time is left.
    pub safety_threshold_secs: u64,
    /// Budget the host platform adapter grants per background period.
    pub budget_secs: u64,
}

impl BackgroundConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn safety_threshold(&self) -> Duration {
        Duration::from_secs(self.safety_threshold_secs)
    }

    pub fn budget(&self) -> Duration {
        Duration::from_secs(self.budget_secs)
    }
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: BACKGROUND_POLL_INTERVAL_SECS,
            safety_threshold_secs: BACKGROUND_SAFETY_THRESHOLD_SECS,
            budget_secs: DEFAULT_BACKGROUND_BUDGET_SECS,
        }
    }
}

/// Connectivity probing (only used by the TCP probe notifier)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReachabilityConfig {
    /// `host:port` to connect to; `None` leaves reachability to the host.
    pub probe_addr: Option<String>,
    pub probe_interval_secs: u64,
    pub probe_timeout_ms: u64,
}

impl Default for ReachabilityConfig {
    fn default() -> Self {
        Self {
            probe_addr: None,
            probe_interval_secs: PROBE_INTERVAL_SECS,
            probe_timeout_ms: PROBE_TIMEOUT_MS,
        }
    }
}
