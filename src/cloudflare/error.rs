//! Cloudflare envelope error-code mapping.
//!
//! Codes with a known meaning become sentinel [`ReconcileError`] variants so
//! classification keeps their identity; everything else is carried raw and
//! classified later by phrase matching.

use crate::error::ReconcileError;

/// Map an envelope error to the unified error type.
///
/// `resource` is the caller's context ("account", "tunnel", "zone",
/// "dns record") used for not-found and conflict variants.
///
/// Code reference: <https://api.cloudflare.com/#getting-started-responses>
/// - 6003/6103/6111: invalid request/auth headers
/// - 9109: unauthorized to access requested resource
/// - 10000: authentication error
/// - 7000/7003: no route for URI / invalid object identifier
/// - 1003: invalid or missing zone id
/// - 81044: record does not exist
/// - 81053..81058: record with that host already exists
pub(crate) fn map_error_code(code: i64, message: String, resource: &str) -> ReconcileError {
    match code {
        6003 | 6103 | 6111 | 9109 | 10000 => ReconcileError::AuthFailure {
            raw_message: Some(message),
        },
        1003 | 7000 | 7003 | 81044 => ReconcileError::NotFound {
            resource: resource.to_string(),
            raw_message: Some(message),
        },
        81053..=81058 => ReconcileError::Conflict {
            resource: resource.to_string(),
            detail: message,
        },
        _ => ReconcileError::Api {
            raw_code: Some(code.to_string()),
            raw_message: message,
        },
    }
}
