//! Application constants

// Background budget tracking
pub const BACKGROUND_POLL_INTERVAL_SECS: u64 = 3;
pub const BACKGROUND_SAFETY_THRESHOLD_SECS: u64 = 10;
/// Background runtime the host grants after leaving the foreground.
pub const DEFAULT_BACKGROUND_BUDGET_SECS: u64 = 180;

// Persistence
pub const DATABASE_FILE_NAME: &str = "messenger.db";

// Mail engine
pub const DEFAULT_ENGINE_LABEL: &str = "ios";

// Reachability probing
pub const PROBE_INTERVAL_SECS: u64 = 5;
pub const PROBE_TIMEOUT_MS: u64 = 1500;

// Event emission
pub const EVENT_CHANNEL_CAPACITY: usize = 64;
