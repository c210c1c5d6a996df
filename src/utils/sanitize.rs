//! Sanitization of user-visible failure messages.
//!
//! Raw API error text can echo request headers or body fragments, which may
//! include tokens or other secrets. Anything exposed outside operator logs
//! (CR status fields, events) goes through [`sanitize_error_message`] first.

use crate::error::ErrorKind;

/// Substrings whose presence means the message may leak a secret.
const SENSITIVE_PATTERNS: &[&str] = &[
    "token",
    "secret",
    "password",
    "credential",
    "api_key",
    "apikey",
    "bearer",
    "authorization",
];

/// Replacement for any message that trips a sensitive pattern.
const GENERIC_MESSAGE: &str = "operation failed - check operator logs for details";

const AUTH_MESSAGE: &str = "authentication failed - check operator logs for details";
const RATE_LIMITED_MESSAGE: &str = "rate limited by api - operation will be retried";
const NOT_FOUND_MESSAGE: &str = "resource not found";

/// Hard cap for pass-through messages: 509 literal characters plus an
/// ellipsis marker, bounding status-field and log size at 512.
const MAX_MESSAGE_CHARS: usize = 509;

/// Sanitize a failure message for external exposure.
///
/// Auth failures, rate limiting and not-found always map to fixed messages
/// regardless of content (their raw text is the most likely to echo request
/// details). Any other message containing a sensitive pattern is replaced
/// wholesale; remaining messages pass through truncated.
#[must_use]
pub fn sanitize_error_message(kind: ErrorKind, message: &str) -> String {
    match kind {
        ErrorKind::AuthFailure => return AUTH_MESSAGE.to_string(),
        ErrorKind::RateLimited => return RATE_LIMITED_MESSAGE.to_string(),
        ErrorKind::NotFound => return NOT_FOUND_MESSAGE.to_string(),
        _ => {}
    }

    let lowered = message.to_lowercase();
    if SENSITIVE_PATTERNS.iter().any(|p| lowered.contains(p)) {
        return GENERIC_MESSAGE.to_string();
    }

    truncate_message(message)
}

/// Truncate a message to [`MAX_MESSAGE_CHARS`] characters plus `"..."`.
fn truncate_message(message: &str) -> String {
    if message.chars().count() <= MAX_MESSAGE_CHARS {
        message.to_string()
    } else {
        let truncated: String = message.chars().take(MAX_MESSAGE_CHARS).collect();
        format!("{truncated}...")
    }
}

/// Maximum number of bytes of a response body to include in debug logs.
const LOG_TRUNCATE_LIMIT: usize = 256;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a response body for debug logging.
///
/// Full bodies can embed DNS record contents or token-bearing headers echoed
/// by the API; logs carry at most the first [`LOG_TRUNCATE_LIMIT`] bytes.
pub(crate) fn truncate_for_log(s: &str) -> String {
    if s.len() <= LOG_TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, LOG_TRUNCATE_LIMIT)],
            s.len()
        )
    }
}
