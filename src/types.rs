use serde::{Deserialize, Serialize};

// ============ Resource references (caller input) ============

/// Caller-supplied reference to an account: an ID, a name, or both.
///
/// At least one of the two must be non-empty. When both are given the ID wins
/// silently; the name hint is not cross-validated against it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRef {
    /// Account ID hint. Empty strings are treated as absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Account name hint. Empty strings are treated as absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Caller-supplied reference to a tunnel, same shape and semantics as
/// [`AccountRef`]. A tunnel belongs to exactly one account, so resolution
/// requires a validated account first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TunnelRef {
    /// Tunnel ID hint. Empty strings are treated as absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Tunnel name hint. Empty strings are treated as absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Caller-supplied reference to a zone. Zones are looked up by domain name
/// only; there is no ID path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRef {
    /// Domain name of the zone (e.g. `example.com`).
    pub domain_name: String,
}

/// Normalize an optional hint: `None` and `""` both mean "not provided".
pub(crate) fn hint(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl AccountRef {
    pub(crate) fn id_hint(&self) -> Option<&str> {
        hint(self.id.as_ref())
    }

    pub(crate) fn name_hint(&self) -> Option<&str> {
        hint(self.name.as_ref())
    }
}

impl TunnelRef {
    pub(crate) fn id_hint(&self) -> Option<&str> {
        hint(self.id.as_ref())
    }

    pub(crate) fn name_hint(&self) -> Option<&str> {
        hint(self.name.as_ref())
    }
}

// ============ Remote resources (client output) ============

/// An account as returned by the remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
}

/// A tunnel as returned by the remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tunnel {
    pub id: String,
    pub name: String,
    /// Whether the tunnel has been soft-deleted remotely.
    #[serde(default)]
    pub deleted: bool,
}

/// A zone as returned by the remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
}

/// A DNS record as returned by the remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    /// Record type as the wire spells it (`CNAME`, `TXT`, ...).
    pub record_type: String,
    /// Fully qualified record name.
    pub name: String,
    /// Record content (CNAME target, TXT payload, ...).
    pub content: String,
    /// TTL in seconds; `1` means "automatic" on Cloudflare.
    pub ttl: u32,
    /// Whether traffic is proxied through the edge. Not meaningful for TXT.
    pub proxied: Option<bool>,
}

// ============ Tunnel creation ============

/// Where a tunnel's ingress configuration lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// Remotely managed: configuration is edited via the API/dashboard and
    /// fetched by connectors with a token.
    Cloudflare,
    /// Locally managed: configuration ships with the connector.
    Local,
}

impl ConfigSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cloudflare => "cloudflare",
            Self::Local => "local",
        }
    }
}

/// Parameters for creating a tunnel.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTunnelParams {
    /// Tunnel name.
    pub name: String,
    /// Base64-encoded 32-byte secret, generated client-side.
    pub tunnel_secret: String,
    /// Configuration source for the new tunnel.
    pub config_src: ConfigSource,
}

/// The serialized credentials blob handed back after tunnel creation.
///
/// Field names follow the cloudflared credentials file format so the blob can
/// be mounted directly for a connector. The secret inside is generated
/// client-side and is not retrievable from the API afterward; callers must
/// persist the blob immediately or recreate the tunnel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TunnelCredentials {
    #[serde(rename = "AccountTag")]
    pub account_tag: String,
    #[serde(rename = "TunnelID")]
    pub tunnel_id: String,
    #[serde(rename = "TunnelName")]
    pub tunnel_name: String,
    #[serde(rename = "TunnelSecret")]
    pub tunnel_secret: String,
}

// ============ DNS record requests ============

/// Request to create a DNS record.
#[derive(Debug, Clone, Serialize)]
pub struct CreateDnsRecordRequest {
    /// Record type as the wire spells it (`CNAME`, `TXT`, ...).
    pub record_type: String,
    /// Fully qualified record name.
    pub name: String,
    /// Record content.
    pub content: String,
    /// TTL in seconds; `1` means "automatic".
    pub ttl: u32,
    /// Whether to proxy traffic through the edge.
    pub proxied: Option<bool>,
}

/// Request to update an existing DNS record in place.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateDnsRecordRequest {
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub proxied: Option<bool>,
}

// ============ Ownership marker ============

/// Content of the TXT record that proves which tunnel owns a hostname.
///
/// The remote service has no native "managed-by" attribute on DNS records, so
/// ownership is encoded out-of-band in a companion TXT record at
/// `"_managed." + fqdn`. TXT is queryable by name/type like any record and is
/// never proxied, so it cannot interfere with traffic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipMarker {
    /// ID of the CNAME record this marker protects.
    pub dns_id: String,
    /// ID of the owning tunnel.
    pub tunnel_id: String,
    /// Name of the owning tunnel, for human inspection.
    pub tunnel_name: String,
}
