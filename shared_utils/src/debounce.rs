use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Defers a callback until `delay` has elapsed without another call.
///
/// Every [`Debouncer::call`] cancels the pending invocation, so a burst of
/// calls runs the callback once with the arguments of the last call.
/// Must be used from within a tokio runtime.
pub struct Debouncer<A> {
    delay: Duration,
    callback: Arc<dyn Fn(A) + Send + Sync>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            delay,
            callback: Arc::new(callback),
            pending: Mutex::new(None),
        }
    }

    pub fn call(&self, args: A) {
        // At most one timer is live while the lock is held.
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let callback = Arc::clone(&self.callback);
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback(args);
        }));
    }

    /// Drops the pending invocation, if any.
    pub fn cancel(&self) {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(pending) = pending {
            pending.abort();
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        let pending = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(pending) = pending {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) + Send + Sync + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |value| sink.lock().unwrap().push(value))
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_calls_runs_once_with_last_arguments() {
        let (calls, callback) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(100), callback);

        for value in 1..=5 {
            debouncer.call(value);
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(*calls.lock().unwrap(), vec![5]);
    }

    #[tokio::test(start_paused = true)]
    async fn calls_separated_by_delay_each_run() {
        let (calls, callback) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(50), callback);

        debouncer.call(1);
        tokio::time::sleep(Duration::from_millis(80)).await;
        debouncer.call(2);
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(*calls.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_leave_one_pending_call() {
        let (calls, callback) = recorder();
        let debouncer = Arc::new(Debouncer::new(Duration::from_millis(50), callback));

        let callers: Vec<_> = (0..8)
            .map(|caller| {
                let debouncer = Arc::clone(&debouncer);
                tokio::spawn(async move {
                    for round in 0..25 {
                        debouncer.call(caller * 100 + round);
                    }
                })
            })
            .collect();
        for caller in callers {
            caller.await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_call() {
        let (calls, callback) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(50), callback);

        debouncer.call(7);
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(calls.lock().unwrap().is_empty());
    }
}
