use std::time::Duration;

use tokio_retry::{strategy::ExponentialBackoff, Retry, RetryIf};
use tracing::{error, warn};

/// Configuration for retry behavior when invoking asynchronous operations.
///
/// The default allows a single retry, which is what the content hooks use
/// before falling back to fixture data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub initial_delay_millis: u64,
    pub max_delay_secs: u64,
    pub max_retries: u32,
}

impl RetryConfig {
    #[must_use]
    pub fn new(initial_delay_millis: u64, max_delay_secs: u64, max_retries: u32) -> Self {
        Self {
            initial_delay_millis,
            max_delay_secs,
            max_retries,
        }
    }

    /// A configuration that runs the operation exactly once.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    fn strategy(&self) -> impl Iterator<Item = Duration> + Clone {
        ExponentialBackoff::from_millis(self.initial_delay_millis)
            .max_delay(Duration::from_secs(self.max_delay_secs))
            .take(self.max_retries as usize)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_millis: 200,
            max_delay_secs: 2,
            max_retries: 1,
        }
    }
}

/// Execute an asynchronous operation with retry/backoff semantics.
///
/// `context` is included in log messages to provide call-site visibility.
pub async fn retry_async<F, Fut, T, E>(
    context: &str,
    config: RetryConfig,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Debug,
{
    let result = Retry::spawn(config.strategy(), || {
        let fut = operation();
        async move {
            fut.await.inspect_err(|err| {
                warn!(error = ?err, retry_context = context, "Operation failed; retrying");
            })
        }
    })
    .await;

    if let Err(err) = &result {
        error!(
            error = ?err,
            retry_context = context,
            "Operation failed after exhausting retries"
        );
    }

    result
}

/// Like [`retry_async`], but only retries errors for which `should_retry`
/// returns `true`. Any other error is returned immediately.
pub async fn retry_async_if<F, Fut, T, E, C>(
    context: &str,
    config: RetryConfig,
    mut operation: F,
    mut should_retry: C,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    C: FnMut(&E) -> bool,
    E: std::fmt::Debug,
{
    let result = RetryIf::spawn(
        config.strategy(),
        || {
            let fut = operation();
            async move {
                fut.await.inspect_err(|err| {
                    warn!(error = ?err, retry_context = context, "Operation failed");
                })
            }
        },
        |err: &E| should_retry(err),
    )
    .await;

    if let Err(err) = &result {
        error!(
            error = ?err,
            retry_context = context,
            "Operation failed; giving up"
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn fast(max_retries: u32) -> RetryConfig {
        RetryConfig::new(1, 1, max_retries)
    }

    #[test]
    fn succeeds_after_retries() {
        tokio_test::block_on(async {
            let attempts = Arc::new(AtomicUsize::new(0));
            let tracker = attempts.clone();

            let result = retry_async("test_success", fast(3), move || {
                let tracker = tracker.clone();
                async move {
                    let current = tracker.fetch_add(1, Ordering::SeqCst);
                    if current < 2 {
                        Err::<_, &'static str>("fail")
                    } else {
                        Ok::<_, &'static str>("ok")
                    }
                }
            })
            .await;

            assert_eq!(result.unwrap(), "ok");
            assert_eq!(attempts.load(Ordering::SeqCst), 3);
        });
    }

    #[test]
    fn default_config_retries_once() {
        tokio_test::block_on(async {
            let attempts = Arc::new(AtomicUsize::new(0));
            let tracker = attempts.clone();

            let config = RetryConfig {
                initial_delay_millis: 1,
                ..RetryConfig::default()
            };
            let result: Result<(), &str> = retry_async("test_failure", config, move || {
                let tracker = tracker.clone();
                async move {
                    tracker.fetch_add(1, Ordering::SeqCst);
                    Err("nope")
                }
            })
            .await;

            assert!(result.is_err());
            assert_eq!(attempts.load(Ordering::SeqCst), 2);
        });
    }

    #[test]
    fn no_retry_runs_once() {
        tokio_test::block_on(async {
            let attempts = Arc::new(AtomicUsize::new(0));
            let tracker = attempts.clone();

            let _ = retry_async("no_retry", RetryConfig::no_retry(), move || {
                let tracker = tracker.clone();
                async move {
                    tracker.fetch_add(1, Ordering::SeqCst);
                    Err::<(), &str>("fail")
                }
            })
            .await;

            assert_eq!(attempts.load(Ordering::SeqCst), 1);
        });
    }

    #[test]
    fn conditional_retry_skips_permanent_errors() {
        tokio_test::block_on(async {
            let attempts = Arc::new(AtomicUsize::new(0));
            let tracker = attempts.clone();

            let result: Result<(), &str> = retry_async_if(
                "permanent",
                fast(3),
                move || {
                    let tracker = tracker.clone();
                    async move {
                        tracker.fetch_add(1, Ordering::SeqCst);
                        Err("not found")
                    }
                },
                |err| *err != "not found",
            )
            .await;

            assert_eq!(result, Err("not found"));
            assert_eq!(attempts.load(Ordering::SeqCst), 1);
        });
    }

    #[test]
    fn conditional_retry_retries_transient_errors() {
        tokio_test::block_on(async {
            let attempts = Arc::new(AtomicUsize::new(0));
            let tracker = attempts.clone();

            let config = fast(2);
            let _: Result<(), &str> = retry_async_if(
                "transient",
                config,
                move || {
                    let tracker = tracker.clone();
                    async move {
                        tracker.fetch_add(1, Ordering::SeqCst);
                        Err("timeout")
                    }
                },
                |_| true,
            )
            .await;

            assert_eq!(
                attempts.load(Ordering::SeqCst),
                config.max_retries as usize + 1
            );
        });
    }
}
