//! Mail engine boundary
//!
//! The protocol engine itself is an external collaborator. This module holds
//! the port it is consumed through, its error type and the parser for the
//! engine's `key=value` info dump.

pub mod error;
pub mod info;
pub mod ports;

pub use error::{EngineError, EngineResult};
pub use info::{parse_core_info, CoreInfo};
pub use ports::{MailEngine, MailEngineFactory, SharedEngine};
