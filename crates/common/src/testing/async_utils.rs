//! Async testing utilities

use std::future::Future;
use std::time::Duration;

/// Poll `condition` every `interval` until it returns true or `timeout`
/// elapses.
///
/// Elapsed time is measured with `tokio::time::Instant`, so under a paused
/// runtime the timeout advances together with the auto-advanced timer.
pub async fn poll_until<F, Fut>(timeout: Duration, interval: Duration, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = tokio::time::Instant::now();

    while start.elapsed() < timeout {
        if condition().await {
            return true;
        }
        tokio::time::sleep(interval).await;
    }

    condition().await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_poll_until_sees_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let flag_clone = flag.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            flag_clone.store(true, Ordering::SeqCst);
        });

        let result = poll_until(Duration::from_secs(1), Duration::from_millis(5), || async {
            flag.load(Ordering::SeqCst)
        })
        .await;

        assert!(result);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_gives_up_under_paused_time() {
        let polls = Arc::new(AtomicUsize::new(0));
        let polls_clone = polls.clone();

        let result = poll_until(Duration::from_secs(1), Duration::from_millis(100), move || {
            polls_clone.fetch_add(1, Ordering::SeqCst);
            async { false }
        })
        .await;

        assert!(!result);
        assert!(polls.load(Ordering::SeqCst) >= 10);
    }
}
