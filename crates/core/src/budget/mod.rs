//! Background budget tracking
//!
//! While the app sits in the background the OS only grants a limited span of
//! execution. The tracker polls the remaining time and tells the orchestrator
//! when it is time to wind the sync loops down.

pub mod tracker;

pub use tracker::{BudgetDecision, BudgetOutcome, BudgetPolicy, BudgetTracker};
