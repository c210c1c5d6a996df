use serde::{Deserialize, Serialize};

use crate::classify::classify_message;

/// Closed classification of every failure the reconciliation core can surface.
///
/// Produced by [`ReconcileError::kind`] (sentinel variants map directly, raw API
/// failures go through phrase matching) and consumed by the retry scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The requested resource does not exist on the remote side.
    NotFound,
    /// The desired state collides with existing remote state
    /// (duplicate record, hostname owned by another tunnel, ...).
    Conflict,
    /// The API rate limit has been exceeded. Transient; backs off exponentially.
    RateLimited,
    /// A transient condition (timeout, connection refused, 5xx gateway errors).
    Temporary,
    /// Authentication failed. Retrying will not change the outcome.
    AuthFailure,
    /// The authenticated principal lacks permission. Retrying will not help.
    PermissionDenied,
    /// The caller-supplied configuration is unusable (e.g. no ID and no name).
    InvalidConfiguration,
    /// A lookup that must be unambiguous matched more than one resource.
    MultipleResourcesFound,
    /// Anything not recognized. Treated as retryable (fail open on transients).
    Unknown,
}

impl ErrorKind {
    /// Errors that require operator/config correction and must never be
    /// requeued automatically.
    #[must_use]
    pub fn needs_operator_action(self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration | Self::MultipleResourcesFound
        )
    }
}

/// Unified error type for all reconciliation operations.
///
/// Variants carry enough context to log and classify without re-contacting the
/// remote service. All variants are serializable for structured status reporting.
/// **新增变体时请同步更新 `kind()` 与 `is_expected()`。**
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ReconcileError {
    /// The named resource was not found.
    NotFound {
        /// What was looked up ("account", "tunnel", "zone", "dns record", ...).
        resource: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// Remote state conflicts with the desired state.
    Conflict {
        /// The conflicting resource ("dns record", "ownership marker", ...).
        resource: String,
        /// What exactly collided.
        detail: String,
    },

    /// API rate limit exceeded (HTTP 429 or equivalent).
    RateLimited {
        /// Suggested wait in seconds before retrying, if the API provided one.
        retry_after: Option<u64>,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// A transient failure (network error, timeout, 502/503/504).
    Temporary {
        /// Error details.
        detail: String,
    },

    /// The supplied credentials were rejected.
    AuthFailure {
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The credentials are valid but lack access to the resource.
    PermissionDenied {
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// Caller-supplied configuration cannot be acted on.
    InvalidConfiguration {
        /// What is wrong with the input.
        detail: String,
    },

    /// A name lookup that must resolve to exactly one resource matched several.
    MultipleResourcesFound {
        /// What was looked up.
        resource: String,
        /// The ambiguous query (name or domain).
        query: String,
        /// How many resources matched.
        count: usize,
    },

    /// An ownership marker exists but its content failed to parse.
    ///
    /// Distinct from [`NotFound`](Self::NotFound): an absent marker means the
    /// hostname is unmanaged, a corrupted one means manual inspection.
    MarkerCorrupted {
        /// Hostname whose marker is unreadable.
        fqdn: String,
        /// Parse failure details.
        detail: String,
    },

    /// An unrecognized failure from the remote API.
    ///
    /// Classified by substring matching on `raw_message`; see [`crate::classify`].
    Api {
        /// Raw error code from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl ReconcileError {
    /// Classify this error. Sentinel variants win; only [`Api`](Self::Api)
    /// falls back to phrase matching on the raw message.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Temporary { .. } => ErrorKind::Temporary,
            Self::AuthFailure { .. } => ErrorKind::AuthFailure,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::InvalidConfiguration { .. } => ErrorKind::InvalidConfiguration,
            Self::MultipleResourcesFound { .. } => ErrorKind::MultipleResourcesFound,
            // Operator intervention required, same handling as bad config.
            Self::MarkerCorrupted { .. } => ErrorKind::InvalidConfiguration,
            Self::Api { raw_message, .. } => classify_message(raw_message),
        }
    }

    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::Conflict { .. }
                | Self::AuthFailure { .. }
                | Self::PermissionDenied { .. }
                | Self::InvalidConfiguration { .. }
                | Self::MultipleResourcesFound { .. }
        )
    }

    /// Shorthand for the idempotent-delete check: deletes treat "already
    /// absent" as success.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl std::fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound {
                resource,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "{resource} not found: {msg}")
                } else {
                    write!(f, "{resource} not found")
                }
            }
            Self::Conflict { resource, detail } => {
                write!(f, "Conflict on {resource}: {detail}")
            }
            Self::RateLimited { retry_after, .. } => {
                if let Some(secs) = retry_after {
                    write!(f, "Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "Rate limited")
                }
            }
            Self::Temporary { detail } => {
                write!(f, "Temporary failure: {detail}")
            }
            Self::AuthFailure { raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "Authentication failed: {msg}")
                } else {
                    write!(f, "Authentication failed")
                }
            }
            Self::PermissionDenied { raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "Permission denied: {msg}")
                } else {
                    write!(f, "Permission denied")
                }
            }
            Self::InvalidConfiguration { detail } => {
                write!(f, "Invalid configuration: {detail}")
            }
            Self::MultipleResourcesFound {
                resource,
                query,
                count,
            } => {
                write!(f, "Found {count} {resource}s matching '{query}', expected exactly one")
            }
            Self::MarkerCorrupted { fqdn, detail } => {
                write!(f, "Ownership marker for '{fqdn}' is corrupted: {detail}")
            }
            Self::Api {
                raw_code,
                raw_message,
            } => {
                if let Some(code) = raw_code {
                    write!(f, "API error {code}: {raw_message}")
                } else {
                    write!(f, "API error: {raw_message}")
                }
            }
        }
    }
}

impl std::error::Error for ReconcileError {}

/// Convenience type alias for `Result<T, ReconcileError>`.
pub type Result<T> = std::result::Result<T, ReconcileError>;
