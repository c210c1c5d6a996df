//! Identity resolution with per-session caching.
//!
//! Turns opaque ID-or-name references into validated identifiers. A resolver
//! instance is scoped to one reconciliation session: resolved IDs are assumed
//! immutable for the session's lifetime and are cached without locking, so an
//! instance must not be shared across concurrent sessions.

use std::sync::Arc;

use crate::error::{ReconcileError, Result};
use crate::traits::RemoteResourceClient;
use crate::types::{AccountRef, TunnelRef, ZoneRef};

/// Resolves and caches validated account/tunnel/zone identifiers.
///
/// The cache fields are owned exclusively by this type; nothing else mutates
/// them. Resolution methods take `&mut self` precisely so the single-session
/// ownership rule is enforced by the borrow checker.
pub struct IdentityResolver {
    client: Arc<dyn RemoteResourceClient>,
    validated_account_id: Option<String>,
    validated_tunnel_id: Option<String>,
    validated_zone_id: Option<String>,
}

impl IdentityResolver {
    /// Create a resolver for one reconciliation session.
    #[must_use]
    pub fn new(client: Arc<dyn RemoteResourceClient>) -> Self {
        Self {
            client,
            validated_account_id: None,
            validated_tunnel_id: None,
            validated_zone_id: None,
        }
    }

    /// The validated account ID, if this session already resolved one.
    #[must_use]
    pub fn account_id(&self) -> Option<&str> {
        self.validated_account_id.as_deref()
    }

    /// The validated tunnel ID, if this session already resolved one.
    #[must_use]
    pub fn tunnel_id(&self) -> Option<&str> {
        self.validated_tunnel_id.as_deref()
    }

    /// The validated zone ID, if this session already resolved one.
    #[must_use]
    pub fn zone_id(&self) -> Option<&str> {
        self.validated_zone_id.as_deref()
    }

    /// Resolve an account reference to a validated account ID.
    ///
    /// ID hint takes priority over the name hint and is trusted once its
    /// existence is confirmed; a name hint supplied alongside it is ignored
    /// without cross-validation. A name lookup must match exactly one account.
    pub async fn resolve_account(&mut self, account: &AccountRef) -> Result<String> {
        if let Some(id) = &self.validated_account_id {
            return Ok(id.clone());
        }

        let id_hint = account.id_hint();
        let name_hint = account.name_hint();

        if id_hint.is_none() && name_hint.is_none() {
            return Err(ReconcileError::InvalidConfiguration {
                detail: "account reference needs an id or a name".to_string(),
            });
        }

        if let Some(id) = id_hint {
            match self.client.get_account(id).await {
                Ok(found) if found.id == id => {
                    log::debug!("resolved account by id: {id}");
                    self.validated_account_id = Some(found.id.clone());
                    return Ok(found.id);
                }
                Ok(found) => {
                    log::warn!(
                        "account lookup for '{id}' returned mismatched id '{}'",
                        found.id
                    );
                }
                // Fall back to the name path only when the ID simply does not
                // exist; auth and transient failures are surfaced as-is.
                Err(e) if e.is_not_found() && name_hint.is_some() => {
                    log::debug!("account id '{id}' not found, falling back to name lookup");
                }
                Err(e) => return Err(e),
            }
        }

        let Some(name) = name_hint else {
            return Err(ReconcileError::NotFound {
                resource: "account".to_string(),
                raw_message: None,
            });
        };

        let matches = self.client.list_accounts(name).await?;
        match matches.len() {
            0 => Err(ReconcileError::NotFound {
                resource: "account".to_string(),
                raw_message: None,
            }),
            1 => {
                let id = matches[0].id.clone();
                log::debug!("resolved account '{name}' to {id}");
                self.validated_account_id = Some(id.clone());
                Ok(id)
            }
            n => Err(ReconcileError::MultipleResourcesFound {
                resource: "account".to_string(),
                query: name.to_string(),
                count: n,
            }),
        }
    }

    /// Resolve a tunnel reference to a validated tunnel ID.
    ///
    /// Requires a resolvable account first; a tunnel belongs to exactly one
    /// account. Same ID-then-name algorithm as [`resolve_account`](Self::resolve_account).
    pub async fn resolve_tunnel(
        &mut self,
        account: &AccountRef,
        tunnel: &TunnelRef,
    ) -> Result<String> {
        if let Some(id) = &self.validated_tunnel_id {
            return Ok(id.clone());
        }

        let account_id = self.resolve_account(account).await?;

        let id_hint = tunnel.id_hint();
        let name_hint = tunnel.name_hint();

        if id_hint.is_none() && name_hint.is_none() {
            return Err(ReconcileError::InvalidConfiguration {
                detail: "tunnel reference needs an id or a name".to_string(),
            });
        }

        if let Some(id) = id_hint {
            match self.client.get_tunnel(&account_id, id).await {
                Ok(found) if found.id == id => {
                    log::debug!("resolved tunnel by id: {id}");
                    self.validated_tunnel_id = Some(found.id.clone());
                    return Ok(found.id);
                }
                Ok(found) => {
                    log::warn!(
                        "tunnel lookup for '{id}' returned mismatched id '{}'",
                        found.id
                    );
                }
                Err(e) if e.is_not_found() && name_hint.is_some() => {
                    log::debug!("tunnel id '{id}' not found, falling back to name lookup");
                }
                Err(e) => return Err(e),
            }
        }

        let Some(name) = name_hint else {
            return Err(ReconcileError::NotFound {
                resource: "tunnel".to_string(),
                raw_message: None,
            });
        };

        let matches = self.client.list_tunnels(&account_id, name).await?;
        match matches.len() {
            0 => Err(ReconcileError::NotFound {
                resource: "tunnel".to_string(),
                raw_message: None,
            }),
            1 => {
                let id = matches[0].id.clone();
                log::debug!("resolved tunnel '{name}' to {id}");
                self.validated_tunnel_id = Some(id.clone());
                Ok(id)
            }
            n => Err(ReconcileError::MultipleResourcesFound {
                resource: "tunnel".to_string(),
                query: name.to_string(),
                count: n,
            }),
        }
    }

    /// Resolve a zone reference to a validated zone ID.
    ///
    /// Zones are looked up by domain name only. The domain must map to
    /// exactly one zone; zero or multiple matches are hard errors.
    pub async fn resolve_zone(&mut self, zone: &ZoneRef) -> Result<String> {
        if let Some(id) = &self.validated_zone_id {
            return Ok(id.clone());
        }

        if zone.domain_name.is_empty() {
            return Err(ReconcileError::InvalidConfiguration {
                detail: "zone reference needs a domain name".to_string(),
            });
        }

        let matches = self.client.list_zones(&zone.domain_name).await?;
        match matches.len() {
            0 => Err(ReconcileError::NotFound {
                resource: "zone".to_string(),
                raw_message: None,
            }),
            1 => {
                let id = matches[0].id.clone();
                log::debug!("resolved zone '{}' to {id}", zone.domain_name);
                self.validated_zone_id = Some(id.clone());
                Ok(id)
            }
            n => Err(ReconcileError::MultipleResourcesFound {
                resource: "zone".to_string(),
                query: zone.domain_name.clone(),
                count: n,
            }),
        }
    }
}
