//! Convergence poller
//!
//! Waits for an asynchronously mutated remote entity to satisfy a condition.
//! The probe runs at a fixed interval, the first run one full interval after
//! the call. The wait ends when the probe is satisfied, the deadline passes,
//! or the cancellation token fires, whichever comes first.

use crate::error::{ProviderError, Result};
use acloud_api::ApiError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep, sleep_until};
use tokio_util::sync::CancellationToken;

/// Spacing between two probes
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Stand-in for waits too long to represent as an instant
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Outcome of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Satisfied,
    NotYet { status: String },
}

impl Probe {
    pub fn not_yet(status: impl Into<String>) -> Self {
        Probe::NotYet {
            status: status.into(),
        }
    }
}

/// Absolute end of one convergence attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollDeadline(Instant);

impl PollDeadline {
    /// Deadline `wait` from now, saturating at a far-future instant
    pub fn after(wait: Duration) -> Self {
        let now = Instant::now();
        Self(now.checked_add(wait).unwrap_or(now + FAR_FUTURE))
    }

    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    pub fn instant(&self) -> Instant {
        self.0
    }
}

/// What to do with a probe error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDisposition {
    Retry,
    Fail,
}

/// Decides whether a probe error ends the wait
pub trait ErrorClassifier: Send + Sync {
    fn classify(&self, error: &ApiError) -> ErrorDisposition;
}

/// Retries every probe error until the deadline
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryAll;

impl ErrorClassifier for RetryAll {
    fn classify(&self, _error: &ApiError) -> ErrorDisposition {
        ErrorDisposition::Retry
    }
}

/// Gives up on responses that cannot succeed by waiting
/// (bad request, unauthorized, forbidden, unprocessable)
#[derive(Debug, Clone, Copy, Default)]
pub struct FailFastOnClientErrors;

impl ErrorClassifier for FailFastOnClientErrors {
    fn classify(&self, error: &ApiError) -> ErrorDisposition {
        match error.status() {
            Some(400 | 401 | 403 | 422) => ErrorDisposition::Fail,
            _ => ErrorDisposition::Retry,
        }
    }
}

/// Fixed-interval poller
#[derive(Clone)]
pub struct Poller {
    interval: Duration,
    classifier: Arc<dyn ErrorClassifier>,
}

impl Default for Poller {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            classifier: Arc::new(RetryAll),
        }
    }
}

impl std::fmt::Debug for Poller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_classifier(mut self, classifier: impl ErrorClassifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run `probe` every interval until it reports [`Probe::Satisfied`]
    ///
    /// Fails with [`ProviderError::DeadlineExceeded`] carrying the last seen
    /// status, with [`ProviderError::Cancelled`] when `cancel` fires, or with
    /// the probe error when the classifier says [`ErrorDisposition::Fail`].
    pub async fn await_condition<F, Fut>(
        &self,
        deadline: PollDeadline,
        cancel: &CancellationToken,
        mut probe: F,
    ) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<Probe, ApiError>>,
    {
        let mut last_status: Option<String> = None;
        let mut attempt: u32 = 0;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
                _ = sleep_until(deadline.instant()) => {
                    return Err(ProviderError::DeadlineExceeded { last_status });
                }
                _ = sleep(self.interval) => {}
            }

            attempt += 1;
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
                _ = sleep_until(deadline.instant()) => {
                    return Err(ProviderError::DeadlineExceeded { last_status });
                }
                outcome = probe() => outcome,
            };

            match outcome {
                Ok(Probe::Satisfied) => {
                    tracing::debug!(attempt, "condition satisfied");
                    return Ok(());
                }
                Ok(Probe::NotYet { status }) => {
                    tracing::debug!(attempt, %status, "condition not yet satisfied");
                    last_status = Some(status);
                }
                // TODO: default to FailFastOnClientErrors once callers stop
                // relying on blind retries
                Err(e) => match self.classifier.classify(&e) {
                    ErrorDisposition::Retry => {
                        tracing::debug!(attempt, error = %e, "probe failed, retrying");
                    }
                    ErrorDisposition::Fail => {
                        tracing::warn!(
                            attempt,
                            error = %e,
                            "probe failed with unrecoverable error"
                        );
                        return Err(ProviderError::Transport(e));
                    }
                },
            }
        }
    }
}
