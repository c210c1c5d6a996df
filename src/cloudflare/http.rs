//! Cloudflare HTTP 请求方法
//!
//! Shared request plumbing: auth headers, logging, HTTP-status mapping and
//! envelope handling. Endpoint methods live in `client.rs`.

use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ReconcileError, Result};
use crate::utils::sanitize::truncate_for_log;

use super::{ApiResponse, CloudflareClient, Credentials};

impl CloudflareClient {
    fn apply_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::ApiToken(token) => {
                builder.header("Authorization", format!("Bearer {token}"))
            }
            Credentials::ApiKey { key, email } => builder
                .header("X-Auth-Key", key.clone())
                .header("X-Auth-Email", email.clone()),
        }
    }

    /// Send a request and unwrap the response envelope.
    ///
    /// HTTP-level failures map to sentinel errors before the body is parsed:
    /// 429 → `RateLimited` (with `Retry-After`), 502-504 and timeouts →
    /// `Temporary`, 401 → `AuthFailure`, 403 → `PermissionDenied`. Envelope
    /// errors go through [`super::error::map_error_code`].
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        method: &str,
        path: &str,
        resource: &str,
    ) -> Result<T> {
        let envelope = self
            .execute_envelope::<T>(builder, method, path, resource)
            .await?;
        envelope.result.ok_or_else(|| ReconcileError::Api {
            raw_code: None,
            raw_message: "missing result field in response".to_string(),
        })
    }

    /// Like [`execute`](Self::execute) but keeps the envelope; delete
    /// responses legitimately carry a null `result`.
    async fn execute_envelope<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        method: &str,
        path: &str,
        resource: &str,
    ) -> Result<ApiResponse<T>> {
        log::debug!("[cloudflare] {method} {path}");

        let response = self.apply_auth(builder).send().await.map_err(|e| {
            if e.is_timeout() {
                ReconcileError::Temporary {
                    detail: format!("request timeout: {e}"),
                }
            } else {
                ReconcileError::Temporary {
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        log::debug!("[cloudflare] Response Status: {status}");

        // Extract Retry-After before consuming the response body.
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[cloudflare] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(ReconcileError::RateLimited {
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[cloudflare] Server error (HTTP {status})");
            return Err(ReconcileError::Temporary {
                detail: format!("HTTP {status}: {body}"),
            });
        }

        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(ReconcileError::AuthFailure {
                raw_message: Some(body),
            });
        }

        if status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(ReconcileError::PermissionDenied {
                raw_message: Some(body),
            });
        }

        let response_text = response.text().await.map_err(|e| ReconcileError::Temporary {
            detail: format!("Failed to read response body: {e}"),
        })?;

        log::debug!(
            "[cloudflare] Response Body: {}",
            truncate_for_log(&response_text)
        );

        let envelope: ApiResponse<T> = serde_json::from_str(&response_text).map_err(|e| {
            log::error!("[cloudflare] JSON parse failed: {e}");
            log::error!(
                "[cloudflare] Raw response: {}",
                truncate_for_log(&response_text)
            );
            ReconcileError::Api {
                raw_code: None,
                raw_message: format!("failed to parse response: {e}"),
            }
        })?;

        if !envelope.success {
            let (code, message) = envelope
                .errors
                .and_then(|errors| {
                    errors
                        .into_iter()
                        .next()
                        .map(|e| (e.code, e.message))
                })
                .unwrap_or((0, "Unknown error".to_string()));
            let err = super::error::map_error_code(code, message, resource);
            if err.is_expected() {
                log::warn!("[cloudflare] API error: {err}");
            } else {
                log::error!("[cloudflare] API error: {err}");
            }
            return Err(err);
        }

        Ok(envelope)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, resource: &str) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        self.execute(self.client.get(&url), "GET", path, resource)
            .await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        resource: &str,
    ) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        self.execute(self.client.post(&url).json(body), "POST", path, resource)
            .await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        resource: &str,
    ) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        self.execute(self.client.put(&url).json(body), "PUT", path, resource)
            .await
    }

    pub(crate) async fn delete(&self, path: &str, resource: &str) -> Result<()> {
        let url = format!("{}{path}", self.base_url);
        // Delete responses carry an envelope with a possibly-null result.
        self.execute_envelope::<serde_json::Value>(self.client.delete(&url), "DELETE", path, resource)
            .await?;
        Ok(())
    }
}
