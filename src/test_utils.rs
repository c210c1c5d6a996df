//! Test helpers: an in-memory [`RemoteResourceClient`] with call counting and
//! error injection. Passed to components directly; there is no global factory
//! to swap.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ReconcileError, Result};
use crate::traits::RemoteResourceClient;
use crate::types::{
    Account, CreateDnsRecordRequest, CreateTunnelParams, DnsRecord, Tunnel,
    UpdateDnsRecordRequest, Zone,
};

#[derive(Default)]
struct FakeState {
    accounts: Vec<Account>,
    /// account_id -> tunnels
    tunnels: HashMap<String, Vec<Tunnel>>,
    zones: Vec<Zone>,
    /// zone_id -> records
    dns_records: HashMap<String, Vec<DnsRecord>>,
    call_counts: HashMap<&'static str, u32>,
    /// method -> queued errors, popped one per call
    failures: HashMap<&'static str, VecDeque<ReconcileError>>,
    last_tunnel_secret: Option<String>,
    next_id: u32,
}

/// In-memory fake of the remote API.
pub struct FakeClient {
    state: Mutex<FakeState>,
}

impl Default for FakeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeClient {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState::default()),
        }
    }

    pub fn add_account(&self, account: Account) {
        self.state.lock().unwrap().accounts.push(account);
    }

    pub fn add_tunnel(&self, account_id: &str, tunnel: Tunnel) {
        self.state
            .lock()
            .unwrap()
            .tunnels
            .entry(account_id.to_string())
            .or_default()
            .push(tunnel);
    }

    pub fn add_zone(&self, zone: Zone) {
        self.state.lock().unwrap().zones.push(zone);
    }

    pub fn add_dns_record(&self, zone_id: &str, record_type: &str, name: &str, content: &str) {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = format!("rec-{}", state.next_id);
        state
            .dns_records
            .entry(zone_id.to_string())
            .or_default()
            .push(DnsRecord {
                id,
                record_type: record_type.to_string(),
                name: name.to_string(),
                content: content.to_string(),
                ttl: 1,
                proxied: None,
            });
    }

    /// Queue an error for the next call to `method`.
    pub fn fail_next(&self, method: &'static str, err: ReconcileError) {
        self.state
            .lock()
            .unwrap()
            .failures
            .entry(method)
            .or_default()
            .push_back(err);
    }

    /// How many times `method` has been invoked.
    pub fn calls(&self, method: &'static str) -> u32 {
        *self
            .state
            .lock()
            .unwrap()
            .call_counts
            .get(method)
            .unwrap_or(&0)
    }

    /// Snapshot of records matching an exact type+name filter.
    pub fn records(&self, zone_id: &str, record_type: &str, name: &str) -> Vec<DnsRecord> {
        self.state
            .lock()
            .unwrap()
            .dns_records
            .get(zone_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.record_type == record_type && r.name == name)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The secret submitted by the most recent `create_tunnel` call.
    pub fn last_tunnel_secret(&self) -> Option<String> {
        self.state.lock().unwrap().last_tunnel_secret.clone()
    }

    fn enter(&self, method: &'static str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        *state.call_counts.entry(method).or_insert(0) += 1;
        if let Some(queue) = state.failures.get_mut(method)
            && let Some(err) = queue.pop_front()
        {
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteResourceClient for FakeClient {
    async fn get_account(&self, account_id: &str) -> Result<Account> {
        self.enter("get_account")?;
        self.state
            .lock()
            .unwrap()
            .accounts
            .iter()
            .find(|a| a.id == account_id)
            .cloned()
            .ok_or_else(|| ReconcileError::NotFound {
                resource: "account".to_string(),
                raw_message: None,
            })
    }

    async fn list_accounts(&self, name: &str) -> Result<Vec<Account>> {
        self.enter("list_accounts")?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .accounts
            .iter()
            .filter(|a| a.name == name)
            .cloned()
            .collect())
    }

    async fn get_tunnel(&self, account_id: &str, tunnel_id: &str) -> Result<Tunnel> {
        self.enter("get_tunnel")?;
        self.state
            .lock()
            .unwrap()
            .tunnels
            .get(account_id)
            .and_then(|ts| ts.iter().find(|t| t.id == tunnel_id))
            .cloned()
            .ok_or_else(|| ReconcileError::NotFound {
                resource: "tunnel".to_string(),
                raw_message: None,
            })
    }

    async fn list_tunnels(&self, account_id: &str, name: &str) -> Result<Vec<Tunnel>> {
        self.enter("list_tunnels")?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .tunnels
            .get(account_id)
            .map(|ts| {
                ts.iter()
                    .filter(|t| t.name == name && !t.deleted)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_tunnel(
        &self,
        account_id: &str,
        params: &CreateTunnelParams,
    ) -> Result<Tunnel> {
        self.enter("create_tunnel")?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let tunnel = Tunnel {
            id: format!("tun-{}", state.next_id),
            name: params.name.clone(),
            deleted: false,
        };
        state.last_tunnel_secret = Some(params.tunnel_secret.clone());
        state
            .tunnels
            .entry(account_id.to_string())
            .or_default()
            .push(tunnel.clone());
        Ok(tunnel)
    }

    async fn delete_tunnel(&self, account_id: &str, tunnel_id: &str) -> Result<()> {
        self.enter("delete_tunnel")?;
        let mut state = self.state.lock().unwrap();
        let tunnels = state.tunnels.entry(account_id.to_string()).or_default();
        let before = tunnels.len();
        tunnels.retain(|t| t.id != tunnel_id);
        if tunnels.len() == before {
            return Err(ReconcileError::NotFound {
                resource: "tunnel".to_string(),
                raw_message: None,
            });
        }
        Ok(())
    }

    async fn cleanup_tunnel_connections(&self, account_id: &str, tunnel_id: &str) -> Result<()> {
        self.enter("cleanup_tunnel_connections")?;
        let state = self.state.lock().unwrap();
        let exists = state
            .tunnels
            .get(account_id)
            .is_some_and(|ts| ts.iter().any(|t| t.id == tunnel_id));
        if exists {
            Ok(())
        } else {
            Err(ReconcileError::NotFound {
                resource: "tunnel".to_string(),
                raw_message: None,
            })
        }
    }

    async fn get_tunnel_token(&self, account_id: &str, tunnel_id: &str) -> Result<String> {
        self.enter("get_tunnel_token")?;
        let state = self.state.lock().unwrap();
        let exists = state
            .tunnels
            .get(account_id)
            .is_some_and(|ts| ts.iter().any(|t| t.id == tunnel_id));
        if exists {
            Ok(format!("fake-token-{tunnel_id}"))
        } else {
            Err(ReconcileError::NotFound {
                resource: "tunnel".to_string(),
                raw_message: None,
            })
        }
    }

    async fn list_zones(&self, domain: &str) -> Result<Vec<Zone>> {
        self.enter("list_zones")?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .zones
            .iter()
            .filter(|z| z.name == domain)
            .cloned()
            .collect())
    }

    async fn list_dns_records(
        &self,
        zone_id: &str,
        record_type: &str,
        name: &str,
    ) -> Result<Vec<DnsRecord>> {
        self.enter("list_dns_records")?;
        Ok(self.records(zone_id, record_type, name))
    }

    async fn create_dns_record(
        &self,
        zone_id: &str,
        req: &CreateDnsRecordRequest,
    ) -> Result<DnsRecord> {
        self.enter("create_dns_record")?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let record = DnsRecord {
            id: format!("rec-{}", state.next_id),
            record_type: req.record_type.clone(),
            name: req.name.clone(),
            content: req.content.clone(),
            ttl: req.ttl,
            proxied: req.proxied,
        };
        state
            .dns_records
            .entry(zone_id.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
        req: &UpdateDnsRecordRequest,
    ) -> Result<DnsRecord> {
        self.enter("update_dns_record")?;
        let mut state = self.state.lock().unwrap();
        let record = state
            .dns_records
            .entry(zone_id.to_string())
            .or_default()
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| ReconcileError::NotFound {
                resource: "dns record".to_string(),
                raw_message: None,
            })?;
        record.record_type = req.record_type.clone();
        record.name = req.name.clone();
        record.content = req.content.clone();
        record.ttl = req.ttl;
        record.proxied = req.proxied;
        Ok(record.clone())
    }

    async fn delete_dns_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        self.enter("delete_dns_record")?;
        let mut state = self.state.lock().unwrap();
        let records = state.dns_records.entry(zone_id.to_string()).or_default();
        let before = records.len();
        records.retain(|r| r.id != record_id);
        if records.len() == before {
            return Err(ReconcileError::NotFound {
                resource: "dns record".to_string(),
                raw_message: None,
            });
        }
        Ok(())
    }
}
