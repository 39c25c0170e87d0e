//! Polling budget tracker

use std::sync::Arc;
use std::time::Duration;

use mailsync_domain::constants::{BACKGROUND_POLL_INTERVAL_SECS, BACKGROUND_SAFETY_THRESHOLD_SECS};
use mailsync_domain::{BackgroundConfig, OsAppState};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::platform::PlatformPort;

/// Poll interval and safety threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetPolicy {
    pub interval: Duration,
    pub threshold: Duration,
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(BACKGROUND_POLL_INTERVAL_SECS),
            threshold: Duration::from_secs(BACKGROUND_SAFETY_THRESHOLD_SECS),
        }
    }
}

impl From<&BackgroundConfig> for BudgetPolicy {
    fn from(config: &BackgroundConfig) -> Self {
        Self { interval: config.poll_interval(), threshold: config.safety_threshold() }
    }
}

/// Result of a single budget check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetDecision {
    /// Not in the background anymore; nothing to track.
    Disarm,
    /// Less than the safety threshold left; stop syncing now.
    Stop { remaining: Duration },
    /// Enough time left; check again after the poll interval.
    Reschedule { remaining: Duration },
}

/// How a tracker run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetOutcome {
    Disarmed,
    Exhausted { remaining: Duration },
    Cancelled,
}

pub struct BudgetTracker {
    platform: Arc<dyn PlatformPort>,
    policy: BudgetPolicy,
}

impl BudgetTracker {
    pub fn new(platform: Arc<dyn PlatformPort>, policy: BudgetPolicy) -> Self {
        Self { platform, policy }
    }

    pub fn policy(&self) -> BudgetPolicy {
        self.policy
    }

    /// Inspect the OS status once.
    pub fn check(&self) -> BudgetDecision {
        let os_state = self.platform.application_state();
        if os_state != OsAppState::Background {
            return BudgetDecision::Disarm;
        }

        let remaining = self.platform.background_time_remaining();
        if remaining < self.policy.threshold {
            BudgetDecision::Stop { remaining }
        } else {
            BudgetDecision::Reschedule { remaining }
        }
    }

    /// Poll until the budget is exhausted, the app leaves the background, or
    /// `cancel` fires. Each check is preceded by one poll interval.
    pub async fn run(&self, cancel: CancellationToken) -> BudgetOutcome {
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!("budget tracker cancelled");
                    return BudgetOutcome::Cancelled;
                }
                () = tokio::time::sleep(self.policy.interval) => {}
            }

            match self.check() {
                BudgetDecision::Disarm => {
                    debug!("app no longer in background, budget tracker disarmed");
                    return BudgetOutcome::Disarmed;
                }
                BudgetDecision::Stop { remaining } => {
                    info!(remaining_secs = remaining.as_secs_f64(), "background budget exhausted");
                    return BudgetOutcome::Exhausted { remaining };
                }
                BudgetDecision::Reschedule { remaining } => {
                    debug!(remaining_secs = remaining.as_secs_f64(), "background budget ok");
                }
            }
        }
    }
}
