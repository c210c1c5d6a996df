//! Error classification by phrase matching.
//!
//! The Cloudflare API does not expose a stable machine-readable error taxonomy
//! across its sub-APIs (tunnels, zones, DNS, access), so failures that were not
//! mapped to a sentinel variant at the HTTP boundary are classified here by
//! case-insensitive substring matching against curated phrase sets. First match
//! wins; broad matching trades occasional false positives for never treating a
//! transient condition as terminal.

use crate::error::{ErrorKind, ReconcileError};

/// Phrases indicating the resource is absent, including sub-API specific codes.
const NOT_FOUND_PHRASES: &[&str] = &[
    "not found",
    "does not exist",
    "no such",
    "404",
    "unknown_application",
    "unknown_group",
    "unknown_policy",
    "unknown_identity_provider",
    "unknown_service_token",
    "route not found",
    "virtual network not found",
    "resource_not_found",
    "could not find",
];

const CONFLICT_PHRASES: &[&str] = &["already exists", "conflict", "duplicate"];

const RATE_LIMITED_PHRASES: &[&str] = &["rate limit", "too many requests", "429"];

/// Rate limiting is also a temporary condition; it is checked first so it gets
/// the exponential backoff treatment instead of a flat delay.
const TEMPORARY_PHRASES: &[&str] = &[
    "timeout",
    "connection refused",
    "temporary",
    "502",
    "503",
    "504",
];

const AUTH_FAILURE_PHRASES: &[&str] = &["unauthorized", "authentication", "401"];

const PERMISSION_DENIED_PHRASES: &[&str] = &["permission denied", "forbidden", "403"];

/// Ordered rule list. Earlier entries take precedence.
const RULES: &[(&[&str], ErrorKind)] = &[
    (NOT_FOUND_PHRASES, ErrorKind::NotFound),
    (CONFLICT_PHRASES, ErrorKind::Conflict),
    (RATE_LIMITED_PHRASES, ErrorKind::RateLimited),
    (TEMPORARY_PHRASES, ErrorKind::Temporary),
    (AUTH_FAILURE_PHRASES, ErrorKind::AuthFailure),
    (PERMISSION_DENIED_PHRASES, ErrorKind::PermissionDenied),
];

/// Classify a raw error message by phrase matching.
///
/// Returns [`ErrorKind::Unknown`] when nothing matches; unknown errors are
/// treated as retryable by the scheduler.
#[must_use]
pub fn classify_message(message: &str) -> ErrorKind {
    let lowered = message.to_lowercase();
    for (phrases, kind) in RULES {
        if phrases.iter().any(|p| lowered.contains(p)) {
            return *kind;
        }
    }
    ErrorKind::Unknown
}

/// Classify any reconciliation failure.
///
/// Sentinel variants produced at the HTTP boundary keep their identity; only
/// unrecognized API errors fall through to [`classify_message`].
#[must_use]
pub fn classify(err: &ReconcileError) -> ErrorKind {
    err.kind()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- NotFound ----

    #[test]
    fn not_found_common_phrases() {
        assert_eq!(classify_message("record not found"), ErrorKind::NotFound);
        assert_eq!(
            classify_message("Tunnel does not exist"),
            ErrorKind::NotFound
        );
        assert_eq!(classify_message("no such host"), ErrorKind::NotFound);
        assert_eq!(classify_message("HTTP 404"), ErrorKind::NotFound);
    }

    #[test]
    fn not_found_sub_api_codes() {
        assert_eq!(classify_message("unknown_application"), ErrorKind::NotFound);
        assert_eq!(classify_message("unknown_group"), ErrorKind::NotFound);
        assert_eq!(classify_message("unknown_policy"), ErrorKind::NotFound);
        assert_eq!(
            classify_message("unknown_identity_provider"),
            ErrorKind::NotFound
        );
        assert_eq!(
            classify_message("unknown_service_token"),
            ErrorKind::NotFound
        );
        assert_eq!(
            classify_message("failure: route not found"),
            ErrorKind::NotFound
        );
        assert_eq!(
            classify_message("virtual network not found"),
            ErrorKind::NotFound
        );
        assert_eq!(classify_message("resource_not_found"), ErrorKind::NotFound);
        assert_eq!(
            classify_message("could not find zone"),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify_message("NOT FOUND"), ErrorKind::NotFound);
        assert_eq!(classify_message("Already Exists"), ErrorKind::Conflict);
        assert_eq!(classify_message("UNAUTHORIZED"), ErrorKind::AuthFailure);
    }

    // ---- Conflict ----

    #[test]
    fn conflict_phrases() {
        assert_eq!(
            classify_message("An A record with that host already exists"),
            ErrorKind::Conflict
        );
        assert_eq!(classify_message("edit conflict"), ErrorKind::Conflict);
        assert_eq!(classify_message("duplicate record"), ErrorKind::Conflict);
    }

    // ---- RateLimited / Temporary ----

    #[test]
    fn rate_limited_phrases() {
        assert_eq!(
            classify_message("rate limit exceeded"),
            ErrorKind::RateLimited
        );
        assert_eq!(
            classify_message("too many requests"),
            ErrorKind::RateLimited
        );
        assert_eq!(classify_message("HTTP 429"), ErrorKind::RateLimited);
    }

    #[test]
    fn temporary_phrases() {
        assert_eq!(classify_message("request timeout"), ErrorKind::Temporary);
        assert_eq!(
            classify_message("connection refused"),
            ErrorKind::Temporary
        );
        assert_eq!(classify_message("temporary failure"), ErrorKind::Temporary);
        assert_eq!(classify_message("502 bad gateway"), ErrorKind::Temporary);
        assert_eq!(
            classify_message("503 service unavailable"),
            ErrorKind::Temporary
        );
        assert_eq!(classify_message("504 gateway timeout"), ErrorKind::Temporary);
    }

    #[test]
    fn rate_limit_wins_over_temporary() {
        // "too many requests, timeout" matches both sets; RateLimited has precedence.
        assert_eq!(
            classify_message("too many requests, timeout"),
            ErrorKind::RateLimited
        );
    }

    // ---- Auth / Permission ----

    #[test]
    fn auth_failure_phrases() {
        assert_eq!(classify_message("unauthorized"), ErrorKind::AuthFailure);
        assert_eq!(
            classify_message("authentication error"),
            ErrorKind::AuthFailure
        );
        assert_eq!(classify_message("HTTP 401"), ErrorKind::AuthFailure);
    }

    #[test]
    fn permission_denied_phrases() {
        assert_eq!(
            classify_message("permission denied"),
            ErrorKind::PermissionDenied
        );
        assert_eq!(classify_message("forbidden"), ErrorKind::PermissionDenied);
        assert_eq!(classify_message("HTTP 403"), ErrorKind::PermissionDenied);
    }

    // ---- Precedence / fallback ----

    #[test]
    fn not_found_wins_over_conflict() {
        assert_eq!(
            classify_message("record not found, possible duplicate"),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn unmatched_is_unknown() {
        assert_eq!(classify_message(""), ErrorKind::Unknown);
        assert_eq!(
            classify_message("an entirely novel failure mode"),
            ErrorKind::Unknown
        );
    }

    #[test]
    fn classify_delegates_to_kind() {
        let e = ReconcileError::Api {
            raw_code: None,
            raw_message: "connection refused".into(),
        };
        assert_eq!(classify(&e), ErrorKind::Temporary);

        let e = ReconcileError::AuthFailure { raw_message: None };
        assert_eq!(classify(&e), ErrorKind::AuthFailure);
    }
}
