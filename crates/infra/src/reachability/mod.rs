//! Connectivity sources implementing [`ReachabilityNotifier`](mailsync_core::ReachabilityNotifier)

pub mod host;
pub mod probe;

pub use host::HostReachability;
pub use probe::ProbeReachability;
