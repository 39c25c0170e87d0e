//! Background-fetch completion callbacks

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Callback handed in by the OS with a background-fetch request
pub type Completion = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct SlotState {
    pending: Vec<Completion>,
    closed: bool,
}

/// Completions waiting for a loop to exit
///
/// Shared between the orchestrator, which attaches callbacks, and the Inbox
/// loop, which drains them once on exit. After draining the slot is closed
/// and further attachments are handed back to the caller.
#[derive(Clone, Default)]
pub struct CompletionSlot {
    state: Arc<Mutex<SlotState>>,
}

impl CompletionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `completion`. Returns it back if the slot was already drained.
    pub fn attach(&self, completion: Completion) -> Result<(), Completion> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(completion);
        }
        state.pending.push(completion);
        Ok(())
    }

    /// Close the slot and return everything queued so far.
    pub fn drain(&self) -> Vec<Completion> {
        let mut state = self.state.lock();
        state.closed = true;
        std::mem::take(&mut state.pending)
    }

    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

impl fmt::Debug for CompletionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CompletionSlot")
            .field("pending", &state.pending.len())
            .field("closed", &state.closed)
            .finish()
    }
}
