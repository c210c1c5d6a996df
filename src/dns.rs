//! DNS ownership reconciliation.
//!
//! Maintains one CNAME record per routed hostname plus a companion TXT record
//! (the ownership marker) proving which tunnel claims that hostname. The
//! marker is what makes multi-tunnel coexistence safe: before touching a
//! hostname the reconciler reads the marker, and a hostname owned by a
//! different tunnel is a conflict, never a silent takeover.
//!
//! The check-then-write sequence is not atomic; the remote service offers no
//! conditional write for these record types. Callers serialize reconciliation
//! per fqdn (single-writer per hostname). Partial effects, such as a CNAME
//! created but the marker not yet written, converge on the next attempt.

use std::sync::Arc;

use crate::error::{ReconcileError, Result};
use crate::traits::RemoteResourceClient;
use crate::types::{CreateDnsRecordRequest, OwnershipMarker, UpdateDnsRecordRequest};

/// Literal prefix of the marker TXT record name. Wire-visible contract;
/// records written by prior versions are found under the same prefix.
pub const OWNERSHIP_RECORD_PREFIX: &str = "_managed.";

/// Suffix turning a tunnel ID into its routable CNAME target.
pub const TUNNEL_DOMAIN_SUFFIX: &str = ".cfargotunnel.com";

/// Cloudflare's "automatic" TTL sentinel.
const AUTOMATIC_TTL: u32 = 1;

/// Result of reading the ownership marker for a hostname.
#[derive(Debug, Clone)]
pub struct ManagedRecordStatus {
    /// ID of the marker TXT record, if one exists.
    pub marker_id: Option<String>,
    /// Parsed marker content. `None` means the hostname is unmanaged.
    pub marker: Option<OwnershipMarker>,
    /// Whether the marker names this reconciler's tunnel.
    pub matches_self: bool,
}

impl ManagedRecordStatus {
    /// Whether any tunnel currently claims this hostname.
    #[must_use]
    pub fn is_managed(&self) -> bool {
        self.marker.is_some()
    }
}

/// Outcome of a successful route upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOutcome {
    /// ID of the CNAME record now routing the hostname.
    pub dns_record_id: String,
    /// `true` if the CNAME was created by this call, `false` if updated.
    pub created: bool,
}

/// Reconciles CNAME + ownership marker pairs for one tunnel in one zone.
///
/// The only writer of marker records under a given fqdn's `_managed.` prefix.
pub struct DnsOwnershipReconciler {
    client: Arc<dyn RemoteResourceClient>,
    zone_id: String,
    tunnel_id: String,
    tunnel_name: String,
}

impl DnsOwnershipReconciler {
    #[must_use]
    pub fn new(
        client: Arc<dyn RemoteResourceClient>,
        zone_id: String,
        tunnel_id: String,
        tunnel_name: String,
    ) -> Self {
        Self {
            client,
            zone_id,
            tunnel_id,
            tunnel_name,
        }
    }

    /// The CNAME content routing traffic into this reconciler's tunnel.
    #[must_use]
    pub fn tunnel_target(&self) -> String {
        format!("{}{TUNNEL_DOMAIN_SUFFIX}", self.tunnel_id)
    }

    fn marker_name(fqdn: &str) -> String {
        format!("{OWNERSHIP_RECORD_PREFIX}{fqdn}")
    }

    /// Read the ownership marker for a hostname.
    ///
    /// Zero TXT records means unmanaged. Exactly one is parsed; a parse
    /// failure is reported as [`ReconcileError::MarkerCorrupted`], which is a
    /// different failure mode from an absent marker. More than one marker is
    /// ambiguous ownership state and a hard error.
    pub async fn get_managed_record(&self, fqdn: &str) -> Result<ManagedRecordStatus> {
        let name = Self::marker_name(fqdn);
        let records = self.client.list_dns_records(&self.zone_id, "TXT", &name).await?;

        match records.len() {
            0 => Ok(ManagedRecordStatus {
                marker_id: None,
                marker: None,
                matches_self: false,
            }),
            1 => {
                let record = &records[0];
                let marker: OwnershipMarker = serde_json::from_str(&record.content)
                    .map_err(|e| ReconcileError::MarkerCorrupted {
                        fqdn: fqdn.to_string(),
                        detail: e.to_string(),
                    })?;
                let matches_self = marker.tunnel_id == self.tunnel_id;
                Ok(ManagedRecordStatus {
                    marker_id: Some(record.id.clone()),
                    marker: Some(marker),
                    matches_self,
                })
            }
            n => Err(ReconcileError::MultipleResourcesFound {
                resource: "ownership marker".to_string(),
                query: name,
                count: n,
            }),
        }
    }

    /// Route a hostname into this reconciler's tunnel.
    ///
    /// Reads the marker first: a hostname owned by a different tunnel is a
    /// conflict and nothing is touched. Otherwise the CNAME is created or
    /// updated in place (at most one operator-managed CNAME per fqdn; an
    /// ambiguous set of existing CNAMEs is a hard error), and finally the
    /// marker is written with the current CNAME record ID and this tunnel's
    /// identity.
    pub async fn upsert_route(&self, fqdn: &str) -> Result<RouteOutcome> {
        let status = self.get_managed_record(fqdn).await?;
        if let Some(marker) = &status.marker
            && !status.matches_self
        {
            log::warn!(
                "refusing to take over '{fqdn}': owned by tunnel '{}' ({})",
                marker.tunnel_name,
                marker.tunnel_id
            );
            return Err(ReconcileError::Conflict {
                resource: "ownership marker".to_string(),
                detail: format!(
                    "'{fqdn}' is owned by tunnel '{}' ({})",
                    marker.tunnel_name, marker.tunnel_id
                ),
            });
        }

        let target = self.tunnel_target();
        let existing = self
            .client
            .list_dns_records(&self.zone_id, "CNAME", fqdn)
            .await?;

        let (dns_record_id, created) = match existing.len() {
            0 => {
                let record = self
                    .client
                    .create_dns_record(
                        &self.zone_id,
                        &CreateDnsRecordRequest {
                            record_type: "CNAME".to_string(),
                            name: fqdn.to_string(),
                            content: target,
                            ttl: AUTOMATIC_TTL,
                            proxied: Some(true),
                        },
                    )
                    .await?;
                log::info!("created CNAME for '{fqdn}' ({})", record.id);
                (record.id, true)
            }
            1 => {
                let record = self
                    .client
                    .update_dns_record(
                        &self.zone_id,
                        &existing[0].id,
                        &UpdateDnsRecordRequest {
                            record_type: "CNAME".to_string(),
                            name: fqdn.to_string(),
                            content: target,
                            ttl: AUTOMATIC_TTL,
                            proxied: Some(true),
                        },
                    )
                    .await?;
                log::debug!("updated CNAME for '{fqdn}' ({})", record.id);
                (record.id, false)
            }
            n => {
                return Err(ReconcileError::MultipleResourcesFound {
                    resource: "dns record".to_string(),
                    query: fqdn.to_string(),
                    count: n,
                });
            }
        };

        self.write_marker(fqdn, &dns_record_id, status.marker_id.as_deref())
            .await?;

        Ok(RouteOutcome {
            dns_record_id,
            created,
        })
    }

    /// Create or update the marker TXT record for a hostname we own.
    async fn write_marker(
        &self,
        fqdn: &str,
        dns_record_id: &str,
        marker_id: Option<&str>,
    ) -> Result<()> {
        let marker = OwnershipMarker {
            dns_id: dns_record_id.to_string(),
            tunnel_id: self.tunnel_id.clone(),
            tunnel_name: self.tunnel_name.clone(),
        };
        let content =
            serde_json::to_string(&marker).map_err(|e| ReconcileError::Api {
                raw_code: None,
                raw_message: format!("failed to serialize ownership marker: {e}"),
            })?;
        let name = Self::marker_name(fqdn);

        if let Some(id) = marker_id {
            self.client
                .update_dns_record(
                    &self.zone_id,
                    id,
                    &UpdateDnsRecordRequest {
                        record_type: "TXT".to_string(),
                        name,
                        content,
                        ttl: AUTOMATIC_TTL,
                        proxied: None,
                    },
                )
                .await?;
        } else {
            self.client
                .create_dns_record(
                    &self.zone_id,
                    &CreateDnsRecordRequest {
                        record_type: "TXT".to_string(),
                        name,
                        content,
                        ttl: AUTOMATIC_TTL,
                        proxied: None,
                    },
                )
                .await?;
        }
        Ok(())
    }

    /// Remove the CNAME and its companion marker for a hostname.
    ///
    /// Only proceeds when `was_created_by_us` is set: a record this
    /// reconciliation did not create is never deleted, so records managed by
    /// another process or cycle stay intact. `NotFound` at any step is
    /// success (the desired end state already holds).
    pub async fn delete_route(
        &self,
        fqdn: &str,
        dns_id: &str,
        was_created_by_us: bool,
    ) -> Result<()> {
        if !was_created_by_us {
            log::warn!("skipping deletion of '{fqdn}': record was not created by this cycle");
            return Ok(());
        }

        match self.client.delete_dns_record(&self.zone_id, dns_id).await {
            Ok(()) => log::info!("deleted CNAME for '{fqdn}' ({dns_id})"),
            Err(e) if e.is_not_found() => {
                log::debug!("CNAME for '{fqdn}' already absent");
            }
            Err(e) => return Err(e),
        }

        // The marker lives and dies with the CNAME it protects.
        let name = Self::marker_name(fqdn);
        let markers = self.client.list_dns_records(&self.zone_id, "TXT", &name).await?;
        for marker in markers {
            match self
                .client
                .delete_dns_record(&self.zone_id, &marker.id)
                .await
            {
                Ok(()) => log::debug!("deleted ownership marker for '{fqdn}'"),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}
