//! Folder sync loops
//!
//! One tokio task per [`LoopFamily`](mailsync_domain::LoopFamily). Each loop
//! repeats jobs, fetch and idle until the application leaves
//! `Running` or its start cycle is cancelled.

pub mod completion;
pub mod folder_loop;

pub use completion::{Completion, CompletionSlot};
pub use folder_loop::{FolderLoop, LoopReport};
