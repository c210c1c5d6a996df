//! Retry scheduling for failed reconciliation attempts.
//!
//! The core issues no sleeps itself; it turns a classified failure into a
//! `(requeue, delay)` pair and leaves the actual timing to the controller that
//! owns the reconciliation loop.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// Default flat delay between attempts.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(10);
/// Default upper bound for any computed delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(5 * 60);
/// Default attempt budget. `0` means unlimited.
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Cap on the exponent for rate-limit backoff so the shift cannot overflow.
const BACKOFF_SHIFT_CAP: u32 = 6;

/// Per-resource retry bookkeeping, owned by the caller and advanced once per
/// reconciliation attempt via [`decide`](Self::decide).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryState {
    /// Flat delay for ordinary transient failures.
    pub base_delay: Duration,
    /// Upper bound for any computed delay.
    pub max_delay: Duration,
    /// Attempt budget; `0` disables the budget (unlimited retries).
    pub max_retries: u32,
    /// Attempts consumed so far.
    pub retry_count: u32,
}

impl Default for RetryState {
    fn default() -> Self {
        Self {
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_count: 0,
        }
    }
}

/// The `(shouldRetry, delay)` pair handed back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDecision {
    /// Whether the attempt should be requeued at all.
    pub requeue: bool,
    /// How long to wait before the next attempt.
    pub delay: Duration,
}

impl RetryState {
    /// Create a state with explicit bounds and a zeroed attempt counter.
    #[must_use]
    pub fn new(base_delay: Duration, max_delay: Duration, max_retries: u32) -> Self {
        Self {
            base_delay,
            max_delay,
            max_retries,
            retry_count: 0,
        }
    }

    /// Whether another attempt is worthwhile for this failure kind.
    ///
    /// Authentication and permission failures are never retried; repeating the
    /// same credentials cannot change an authorization outcome. Everything
    /// else, including [`ErrorKind::Unknown`], retries until the budget is
    /// exhausted (fail open toward transient conditions).
    #[must_use]
    pub fn should_retry(&self, kind: ErrorKind) -> bool {
        if matches!(kind, ErrorKind::AuthFailure | ErrorKind::PermissionDenied) {
            return false;
        }
        self.max_retries == 0 || self.retry_count < self.max_retries
    }

    /// Delay before the next attempt for this failure kind.
    ///
    /// - `NotFound` → zero; the caller should treat it as terminal, not wait.
    /// - `AuthFailure`/`PermissionDenied` → `max_delay`; retries are disabled
    ///   for these kinds, the long delay bounds any accidental requeue.
    /// - `RateLimited` → exponential backoff `base_delay * 2^retry_count`,
    ///   shift capped, clamped to `max_delay`.
    /// - everything else → flat `base_delay`.
    #[must_use]
    pub fn delay(&self, kind: ErrorKind) -> Duration {
        match kind {
            ErrorKind::NotFound => Duration::ZERO,
            ErrorKind::AuthFailure | ErrorKind::PermissionDenied => self.max_delay,
            ErrorKind::RateLimited => {
                let shift = self.retry_count.min(BACKOFF_SHIFT_CAP);
                let backoff = self
                    .base_delay
                    .saturating_mul(1_u32 << shift);
                backoff.min(self.max_delay)
            }
            _ => self.base_delay,
        }
    }

    /// Consult the schedule for one failed attempt and advance the counter.
    ///
    /// Configuration errors ([`ErrorKind::InvalidConfiguration`],
    /// [`ErrorKind::MultipleResourcesFound`]) are reported as non-requeue:
    /// they require operator correction, so handing them back to the queue
    /// would spin without progress.
    pub fn decide(&mut self, kind: ErrorKind) -> RetryDecision {
        let requeue = !kind.needs_operator_action() && self.should_retry(kind);
        let delay = self.delay(kind);
        self.retry_count = self.retry_count.saturating_add(1);
        RetryDecision { requeue, delay }
    }

    /// Reset the attempt counter after a successful reconciliation.
    pub fn reset(&mut self) {
        self.retry_count = 0;
    }
}
