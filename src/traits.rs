use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Account, CreateDnsRecordRequest, CreateTunnelParams, DnsRecord, Tunnel,
    UpdateDnsRecordRequest, Zone,
};

/// Capability interface to the remote account/tunnel/zone/DNS API.
///
/// The reconciliation core never constructs a client itself; callers inject
/// one (production: [`crate::cloudflare::CloudflareClient`], tests: an
/// in-memory fake). Every method is a single remote call with no internal
/// retry; failures are surfaced as [`crate::ReconcileError`] and classified by
/// the caller. Cancellation is cooperative: dropping the returned future
/// aborts the in-flight request, and partially applied effects are reconciled
/// on the next attempt rather than rolled back.
#[async_trait]
pub trait RemoteResourceClient: Send + Sync {
    /// Fetch an account by exact ID.
    async fn get_account(&self, account_id: &str) -> Result<Account>;

    /// List accounts whose name matches exactly.
    async fn list_accounts(&self, name: &str) -> Result<Vec<Account>>;

    /// Fetch a tunnel by exact ID within an account.
    async fn get_tunnel(&self, account_id: &str, tunnel_id: &str) -> Result<Tunnel>;

    /// List non-deleted tunnels in an account whose name matches exactly.
    async fn list_tunnels(&self, account_id: &str, name: &str) -> Result<Vec<Tunnel>>;

    /// Create a tunnel with a caller-generated secret.
    async fn create_tunnel(&self, account_id: &str, params: &CreateTunnelParams)
    -> Result<Tunnel>;

    /// Delete a tunnel.
    async fn delete_tunnel(&self, account_id: &str, tunnel_id: &str) -> Result<()>;

    /// Drop any stale connections still registered on a tunnel.
    async fn cleanup_tunnel_connections(&self, account_id: &str, tunnel_id: &str) -> Result<()>;

    /// Fetch the reusable connector token for a remotely-managed tunnel.
    async fn get_tunnel_token(&self, account_id: &str, tunnel_id: &str) -> Result<String>;

    /// List zones whose domain name matches exactly.
    async fn list_zones(&self, domain: &str) -> Result<Vec<Zone>>;

    /// List DNS records in a zone filtered by exact type and name.
    async fn list_dns_records(
        &self,
        zone_id: &str,
        record_type: &str,
        name: &str,
    ) -> Result<Vec<DnsRecord>>;

    /// Create a DNS record.
    async fn create_dns_record(
        &self,
        zone_id: &str,
        req: &CreateDnsRecordRequest,
    ) -> Result<DnsRecord>;

    /// Overwrite an existing DNS record in place.
    async fn update_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
        req: &UpdateDnsRecordRequest,
    ) -> Result<DnsRecord>;

    /// Delete a DNS record by ID.
    async fn delete_dns_record(&self, zone_id: &str, record_id: &str) -> Result<()>;
}
