//! # mailsync core
//!
//! Lifecycle logic for the mailbox sync loops. No platform or protocol code.
//!
//! This crate contains:
//! - Port interfaces for the mail engine, the OS and connectivity sources
//! - The folder sync loops and the background budget tracker
//! - The [`Orchestrator`] tying them to OS lifecycle callbacks
//!
//! ## Architecture Principles
//! - Only depends on `mailsync-domain`
//! - All external collaborators via traits
//! - Time comes from tokio's timer, so tests run on a paused clock

pub mod budget;
pub mod engine;
pub mod lifecycle;
pub mod platform;
pub mod reachability;
pub mod sync;

// Port mocks
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use budget::{BudgetDecision, BudgetOutcome, BudgetPolicy, BudgetTracker};
pub use engine::{EngineError, MailEngine, MailEngineFactory, SharedEngine};
pub use lifecycle::{
    EventBus, LifecycleError, Orchestrator, OrchestratorOptions, OrchestratorPorts,
};
pub use platform::{AppStatusProvider, BackgroundTasks, PlatformPort, SyncSettings};
pub use reachability::{ReachabilityError, ReachabilityMonitor, ReachabilityNotifier};
pub use sync::{Completion, FolderLoop, LoopReport};
