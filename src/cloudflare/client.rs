//! [`RemoteResourceClient`] implementation over the Cloudflare v4 API.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::traits::RemoteResourceClient;
use crate::types::{
    Account, CreateDnsRecordRequest, CreateTunnelParams, DnsRecord, Tunnel,
    UpdateDnsRecordRequest, Zone,
};

use super::{CloudflareClient, WireDnsRecord, WireTunnel};

impl From<WireTunnel> for Tunnel {
    fn from(wire: WireTunnel) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            deleted: wire.deleted_at.is_some(),
        }
    }
}

impl From<WireDnsRecord> for DnsRecord {
    fn from(wire: WireDnsRecord) -> Self {
        Self {
            id: wire.id,
            record_type: wire.record_type,
            name: wire.name,
            content: wire.content,
            ttl: wire.ttl,
            proxied: wire.proxied,
        }
    }
}

/// Body for DNS record create/update; the wire spells the type field `type`.
#[derive(Serialize)]
struct RecordBody<'a> {
    #[serde(rename = "type")]
    record_type: &'a str,
    name: &'a str,
    content: &'a str,
    ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxied: Option<bool>,
}

#[async_trait]
impl RemoteResourceClient for CloudflareClient {
    async fn get_account(&self, account_id: &str) -> Result<Account> {
        self.get(&format!("/accounts/{account_id}"), "account").await
    }

    async fn list_accounts(&self, name: &str) -> Result<Vec<Account>> {
        let path = format!("/accounts?name={}", urlencoding::encode(name));
        self.get(&path, "account").await
    }

    async fn get_tunnel(&self, account_id: &str, tunnel_id: &str) -> Result<Tunnel> {
        let wire: WireTunnel = self
            .get(
                &format!("/accounts/{account_id}/cfd_tunnel/{tunnel_id}"),
                "tunnel",
            )
            .await?;
        Ok(wire.into())
    }

    async fn list_tunnels(&self, account_id: &str, name: &str) -> Result<Vec<Tunnel>> {
        let path = format!(
            "/accounts/{account_id}/cfd_tunnel?name={}&is_deleted=false",
            urlencoding::encode(name)
        );
        let wires: Vec<WireTunnel> = self.get(&path, "tunnel").await?;
        Ok(wires.into_iter().map(Tunnel::from).collect())
    }

    async fn create_tunnel(
        &self,
        account_id: &str,
        params: &CreateTunnelParams,
    ) -> Result<Tunnel> {
        let wire: WireTunnel = self
            .post(
                &format!("/accounts/{account_id}/cfd_tunnel"),
                params,
                "tunnel",
            )
            .await?;
        Ok(wire.into())
    }

    async fn delete_tunnel(&self, account_id: &str, tunnel_id: &str) -> Result<()> {
        self.delete(
            &format!("/accounts/{account_id}/cfd_tunnel/{tunnel_id}"),
            "tunnel",
        )
        .await
    }

    async fn cleanup_tunnel_connections(&self, account_id: &str, tunnel_id: &str) -> Result<()> {
        self.delete(
            &format!("/accounts/{account_id}/cfd_tunnel/{tunnel_id}/connections"),
            "tunnel",
        )
        .await
    }

    async fn get_tunnel_token(&self, account_id: &str, tunnel_id: &str) -> Result<String> {
        self.get(
            &format!("/accounts/{account_id}/cfd_tunnel/{tunnel_id}/token"),
            "tunnel",
        )
        .await
    }

    async fn list_zones(&self, domain: &str) -> Result<Vec<Zone>> {
        let path = format!("/zones?name={}", urlencoding::encode(domain));
        self.get(&path, "zone").await
    }

    async fn list_dns_records(
        &self,
        zone_id: &str,
        record_type: &str,
        name: &str,
    ) -> Result<Vec<DnsRecord>> {
        let path = format!(
            "/zones/{zone_id}/dns_records?type={}&name={}",
            urlencoding::encode(record_type),
            urlencoding::encode(name)
        );
        let wires: Vec<WireDnsRecord> = self.get(&path, "dns record").await?;
        Ok(wires.into_iter().map(DnsRecord::from).collect())
    }

    async fn create_dns_record(
        &self,
        zone_id: &str,
        req: &CreateDnsRecordRequest,
    ) -> Result<DnsRecord> {
        let body = RecordBody {
            record_type: &req.record_type,
            name: &req.name,
            content: &req.content,
            ttl: req.ttl,
            proxied: req.proxied,
        };
        let wire: WireDnsRecord = self
            .post(&format!("/zones/{zone_id}/dns_records"), &body, "dns record")
            .await?;
        Ok(wire.into())
    }

    async fn update_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
        req: &UpdateDnsRecordRequest,
    ) -> Result<DnsRecord> {
        let body = RecordBody {
            record_type: &req.record_type,
            name: &req.name,
            content: &req.content,
            ttl: req.ttl,
            proxied: req.proxied,
        };
        let wire: WireDnsRecord = self
            .put(
                &format!("/zones/{zone_id}/dns_records/{record_id}"),
                &body,
                "dns record",
            )
            .await?;
        Ok(wire.into())
    }

    async fn delete_dns_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        self.delete(
            &format!("/zones/{zone_id}/dns_records/{record_id}"),
            "dns record",
        )
        .await
    }
}
