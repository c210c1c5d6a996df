//! Cloudflare API wire types.

use serde::Deserialize;

/// Cloudflare v4 response envelope.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    pub errors: Option<Vec<ApiErrorBody>>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    pub message: String,
}

/// Tunnel as the `cfd_tunnel` endpoints return it.
#[derive(Debug, Deserialize)]
pub struct WireTunnel {
    pub id: String,
    pub name: String,
    /// Set when the tunnel has been soft-deleted.
    pub deleted_at: Option<String>,
}

/// DNS record as the `dns_records` endpoints return it.
#[derive(Debug, Deserialize)]
pub struct WireDnsRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub proxied: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_success_parses() {
        let json = r#"{"success":true,"result":{"id":"t1","name":"edge","deleted_at":null},"errors":[]}"#;
        let resp: ApiResponse<WireTunnel> = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        let tunnel = resp.result.unwrap();
        assert_eq!(tunnel.id, "t1");
        assert!(tunnel.deleted_at.is_none());
    }

    #[test]
    fn envelope_error_parses() {
        let json = r#"{"success":false,"result":null,"errors":[{"code":81044,"message":"Record does not exist."}]}"#;
        let resp: ApiResponse<WireDnsRecord> = serde_json::from_str(json).unwrap();
        assert!(!resp.success);
        let errors = resp.errors.unwrap();
        assert_eq!(errors[0].code, 81044);
    }

    #[test]
    fn dns_record_type_field_renamed() {
        let json = r#"{"id":"r1","type":"CNAME","name":"app.example.com","content":"t.cfargotunnel.com","ttl":1,"proxied":true}"#;
        let record: WireDnsRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.record_type, "CNAME");
        assert_eq!(record.proxied, Some(true));
    }
}
