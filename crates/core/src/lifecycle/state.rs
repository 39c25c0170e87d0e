//! Shared application state

use mailsync_domain::ApplicationState;
use tokio::sync::watch;

/// Single-writer, many-reader holder for [`ApplicationState`]
///
/// Backed by a `watch` channel so loops on other tasks always observe the
/// latest value and can await changes.
#[derive(Debug)]
pub struct SharedAppState {
    tx: watch::Sender<ApplicationState>,
}

impl SharedAppState {
    pub fn new(initial: ApplicationState) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn get(&self) -> ApplicationState {
        *self.tx.borrow()
    }

    /// Store `next` and return the previous value.
    pub fn replace(&self, next: ApplicationState) -> ApplicationState {
        self.tx.send_replace(next)
    }

    pub fn subscribe(&self) -> watch::Receiver<ApplicationState> {
        self.tx.subscribe()
    }
}

impl Default for SharedAppState {
    fn default() -> Self {
        Self::new(ApplicationState::Stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_returns_previous() {
        let state = SharedAppState::default();

        assert_eq!(state.replace(ApplicationState::Running), ApplicationState::Stopped);
        assert_eq!(state.replace(ApplicationState::Background), ApplicationState::Running);
        assert_eq!(state.get(), ApplicationState::Background);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let state = SharedAppState::default();
        let mut rx = state.subscribe();

        state.replace(ApplicationState::Running);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), ApplicationState::Running);
    }
}
