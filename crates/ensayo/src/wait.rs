//! Polling synchronization shared by every composite intent.
//!
//! All retry/backoff policy lives here: primitives, dropdown selection and
//! table read-back call `poll_until` instead of hand-rolling delay loops.

use std::future::Future;
use std::time::Duration;

use crate::result::{EnsayoError, EnsayoResult};

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for a polling wait
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    /// Total time budget
    pub timeout: Duration,
    /// Delay between condition checks
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(crate::config::DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl WaitOptions {
    /// Create options with a timeout in milliseconds
    #[must_use]
    pub const fn timeout_ms(timeout_ms: u64) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Poll an async condition until it yields a value or the budget runs out.
///
/// The condition returns `Ok(Some(value))` when satisfied, `Ok(None)` to
/// keep polling, or `Err` to abort immediately (driver-level failures are
/// not retried). On timeout the `on_timeout` closure produces the error,
/// so callers surface domain errors (`ElementNotFound`, `OptionNotFound`)
/// instead of a generic timeout.
pub async fn poll_until<T, F, Fut, E>(
    options: WaitOptions,
    mut condition: F,
    on_timeout: E,
) -> EnsayoResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = EnsayoResult<Option<T>>>,
    E: FnOnce() -> EnsayoError,
{
    let start = tokio::time::Instant::now();
    loop {
        if let Some(value) = condition().await? {
            return Ok(value);
        }
        if start.elapsed() >= options.timeout {
            return Err(on_timeout());
        }
        let remaining = options.timeout.saturating_sub(start.elapsed());
        tokio::time::sleep(options.poll_interval.min(remaining)).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_condition_met_immediately() {
        let result = poll_until(
            WaitOptions::timeout_ms(100),
            || async { Ok(Some(42)) },
            || EnsayoError::InvalidState {
                message: "unreachable".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(result, 42);
    }

    #[tokio::test]
    async fn test_condition_met_after_polls() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in = Arc::clone(&calls);
        let options = WaitOptions::timeout_ms(1000).with_poll_interval(Duration::from_millis(1));
        let result = poll_until(
            options,
            move || {
                let calls = Arc::clone(&calls_in);
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) >= 3 {
                        Ok(Some("ready"))
                    } else {
                        Ok(None)
                    }
                }
            },
            || EnsayoError::InvalidState {
                message: "unreachable".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(result, "ready");
        assert!(calls.load(Ordering::SeqCst) >= 4);
    }

    #[tokio::test]
    async fn test_timeout_produces_domain_error() {
        let options = WaitOptions::timeout_ms(20).with_poll_interval(Duration::from_millis(5));
        let err = poll_until(
            options,
            || async { Ok(None::<()>) },
            || EnsayoError::ElementNotFound {
                selector: ".toast".to_string(),
                timeout_ms: 20,
            },
        )
        .await
        .unwrap_err();
        match err {
            EnsayoError::ElementNotFound { selector, .. } => assert_eq!(selector, ".toast"),
            other => panic!("expected ElementNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_condition_error_aborts_without_retry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in = Arc::clone(&calls);
        let err = poll_until(
            WaitOptions::timeout_ms(1000),
            move || {
                let calls = Arc::clone(&calls_in);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<Option<()>, _>(EnsayoError::Driver {
                        message: "target closed".to_string(),
                    })
                }
            },
            || EnsayoError::InvalidState {
                message: "unreachable".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EnsayoError::Driver { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
