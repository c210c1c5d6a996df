//! Cloudflare-backed [`RemoteResourceClient`](crate::traits::RemoteResourceClient)
//! implementation.

mod client;
mod error;
mod http;
mod types;

use std::time::Duration;

use reqwest::Client;

pub(crate) use types::{ApiResponse, WireDnsRecord, WireTunnel};

pub(crate) const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Authentication material for the Cloudflare API.
///
/// Either a scoped API token (preferred) or the legacy global key + email
/// pair. Treated as opaque input to client construction; credential loading
/// and rotation are the caller's concern.
#[derive(Clone)]
pub enum Credentials {
    /// Scoped API token, sent as `Authorization: Bearer`.
    ApiToken(String),
    /// Legacy global API key, sent as `X-Auth-Key` + `X-Auth-Email`.
    ApiKey {
        key: String,
        email: String,
    },
}

impl std::fmt::Debug for Credentials {
    // Secrets never reach Debug output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiToken(_) => f.write_str("Credentials::ApiToken(<redacted>)"),
            Self::ApiKey { email, .. } => f
                .debug_struct("Credentials::ApiKey")
                .field("key", &"<redacted>")
                .field("email", email)
                .finish(),
        }
    }
}

/// HTTP client for the Cloudflare v4 API.
///
/// Constructed with explicit credentials; callers inject it into the
/// reconciliation components (no process-wide factory to swap for tests).
pub struct CloudflareClient {
    pub(crate) client: Client,
    pub(crate) credentials: Credentials,
    pub(crate) base_url: String,
}

impl CloudflareClient {
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            client: create_http_client(),
            credentials,
            base_url: CF_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API base (test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// 创建带超时配置的 HTTP Client
#[allow(clippy::expect_used)]
fn create_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_token() {
        let c = Credentials::ApiToken("super-secret".to_string());
        let out = format!("{c:?}");
        assert!(!out.contains("super-secret"));
        assert!(out.contains("<redacted>"));
    }

    #[test]
    fn debug_redacts_key_but_keeps_email() {
        let c = Credentials::ApiKey {
            key: "super-secret".to_string(),
            email: "ops@example.com".to_string(),
        };
        let out = format!("{c:?}");
        assert!(!out.contains("super-secret"));
        assert!(out.contains("ops@example.com"));
    }

    #[test]
    fn base_url_override() {
        let c = CloudflareClient::new(Credentials::ApiToken("t".into()))
            .with_base_url("http://127.0.0.1:8787");
        assert_eq!(c.base_url, "http://127.0.0.1:8787");
    }
}
