//! Network reachability monitoring

pub mod error;
pub mod monitor;
pub mod ports;

pub use error::ReachabilityError;
pub use monitor::{ReachabilityHandler, ReachabilityMonitor};
pub use ports::{ConnectionCallback, ReachabilityNotifier};
