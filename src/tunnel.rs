//! Idempotent tunnel lifecycle operations.

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use rand::RngCore;

use crate::error::Result;
use crate::traits::RemoteResourceClient;
use crate::types::{ConfigSource, CreateTunnelParams, TunnelCredentials};

/// Length of the client-generated tunnel secret in raw bytes.
pub const TUNNEL_SECRET_LEN: usize = 32;

/// Creates, deletes and fetches tokens for tunnels within one account.
pub struct TunnelLifecycle {
    client: Arc<dyn RemoteResourceClient>,
}

impl TunnelLifecycle {
    #[must_use]
    pub fn new(client: Arc<dyn RemoteResourceClient>) -> Self {
        Self { client }
    }

    /// Create a tunnel and return its ID together with the credentials blob.
    ///
    /// The secret is generated client-side from the OS RNG and submitted
    /// base64-encoded; the API never returns it again. Losing the returned
    /// credentials means the tunnel must be recreated, so callers persist the
    /// blob before doing anything else with the tunnel.
    pub async fn create(
        &self,
        account_id: &str,
        name: &str,
        config_source: ConfigSource,
    ) -> Result<(String, TunnelCredentials)> {
        let mut secret = [0_u8; TUNNEL_SECRET_LEN];
        rand::rng().fill_bytes(&mut secret);
        let tunnel_secret = BASE64.encode(secret);

        let params = CreateTunnelParams {
            name: name.to_string(),
            tunnel_secret: tunnel_secret.clone(),
            config_src: config_source,
        };
        let tunnel = self.client.create_tunnel(account_id, &params).await?;
        log::info!("created tunnel '{name}' ({})", tunnel.id);

        let credentials = TunnelCredentials {
            account_tag: account_id.to_string(),
            tunnel_id: tunnel.id.clone(),
            tunnel_name: tunnel.name,
            tunnel_secret,
        };
        Ok((tunnel.id, credentials))
    }

    /// Delete a tunnel, treating "already absent" as success.
    ///
    /// Stale connections are purged first so the delete cannot fail on an
    /// active-connections check. A `NotFound` at either step means the desired
    /// end state already holds; any other failure is surfaced.
    pub async fn delete(&self, account_id: &str, tunnel_id: &str) -> Result<()> {
        match self
            .client
            .cleanup_tunnel_connections(account_id, tunnel_id)
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                log::debug!("tunnel {tunnel_id} has no connections to clean up");
            }
            Err(e) => return Err(e),
        }

        match self.client.delete_tunnel(account_id, tunnel_id).await {
            Ok(()) => {
                log::info!("deleted tunnel {tunnel_id}");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                log::debug!("tunnel {tunnel_id} already absent");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch the reusable connector token for a remotely-managed tunnel.
    ///
    /// Distinct from the creation secret: the token can be fetched again at
    /// any time and does not require anything beyond a validated account.
    pub async fn get_token(&self, account_id: &str, tunnel_id: &str) -> Result<String> {
        self.client.get_tunnel_token(account_id, tunnel_id).await
    }
}
