//! One-shot deferred tasks (reminders, self-deleting confirmations).
//!
//! Tasks are detached tokio tasks: they outlive the invocation that
//! scheduled them and are dropped, unfired, when the process exits.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::debug;

/// Schedules deferred tasks and counts the ones still waiting to fire.
#[derive(Debug, Clone, Default)]
pub struct Deferred {
    pending: Arc<AtomicUsize>,
}

impl Deferred {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` once, after `delay`.
    pub fn schedule<F>(&self, delay: Duration, task: F) -> DeferredHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let pending = PendingGuard::new(self.pending.clone());
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            drop(pending);
            task.await;
        });
        debug!("Scheduled deferred task in {:?}", delay);
        DeferredHandle { handle }
    }

    /// Tasks scheduled but not yet fired or cancelled.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }
}

/// Handle to a scheduled task. Dropping it leaves the task running.
#[derive(Debug)]
pub struct DeferredHandle {
    handle: JoinHandle<()>,
}

impl DeferredHandle {
    /// Cancel the task if it hasn't fired yet.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Decrements the pending count when the task fires or is aborted.
struct PendingGuard(Arc<AtomicUsize>);

impl PendingGuard {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        Self(counter)
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    #[tokio::test(start_paused = true)]
    async fn test_task_fires_after_delay() {
        let deferred = Deferred::new();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        deferred.schedule(Duration::from_secs(5), async move {
            flag.store(true, Ordering::SeqCst);
        });
        assert_eq!(deferred.pending(), 1);

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert!(!fired.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        assert!(fired.load(Ordering::SeqCst));
        assert_eq!(deferred.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let deferred = Deferred::new();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let handle = deferred.schedule(Duration::from_secs(1), async move {
            flag.store(true, Ordering::SeqCst);
        });
        handle.cancel();

        tokio::time::sleep(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert!(!fired.load(Ordering::SeqCst));
        assert!(handle.is_finished());
        assert_eq!(deferred.pending(), 0);
    }
}
