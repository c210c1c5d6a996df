//! # cloudflare-tunnel-reconciler
//!
//! The reconciliation core for declarative controllers managing Cloudflare
//! accounts, tunnels, zones and DNS records: identity resolution with
//! per-session caching, idempotent tunnel lifecycle, DNS ownership
//! reconciliation with a TXT marker convention, and an error taxonomy with a
//! retry-scheduling policy.
//!
//! ## Components
//!
//! | Component | Module | Responsibility |
//! |-----------|--------|----------------|
//! | [`IdentityResolver`] | `resolver` | ID-or-name references → validated, cached IDs |
//! | [`TunnelLifecycle`] | `tunnel` | idempotent tunnel create/delete, connector tokens |
//! | [`DnsOwnershipReconciler`] | `dns` | CNAME + ownership marker per hostname |
//! | [`classify`](classify::classify) | `classify` | failure → [`ErrorKind`] |
//! | [`RetryState`] | `retry` | classified failure → `(requeue, delay)` |
//! | [`CloudflareClient`] | `cloudflare` | reqwest-backed [`RemoteResourceClient`] |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use cloudflare_tunnel_reconciler::{
//!     AccountRef, CloudflareClient, ConfigSource, Credentials, IdentityResolver,
//!     TunnelLifecycle, ZoneRef,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(CloudflareClient::new(Credentials::ApiToken(
//!     "your-token".to_string(),
//! )));
//!
//! // One resolver per reconciliation session; validated IDs are cached.
//! let mut resolver = IdentityResolver::new(client.clone());
//! let account_id = resolver
//!     .resolve_account(&AccountRef {
//!         id: None,
//!         name: Some("my-account".to_string()),
//!     })
//!     .await?;
//! let zone_id = resolver
//!     .resolve_zone(&ZoneRef {
//!         domain_name: "example.com".to_string(),
//!     })
//!     .await?;
//!
//! // Create a tunnel; persist the credentials blob immediately, the secret
//! // inside is not retrievable afterward.
//! let lifecycle = TunnelLifecycle::new(client.clone());
//! let (tunnel_id, credentials) = lifecycle
//!     .create(&account_id, "edge", ConfigSource::Cloudflare)
//!     .await?;
//! println!("{}", serde_json::to_string(&credentials)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure handling
//!
//! Every remote failure is a [`ReconcileError`]; [`ReconcileError::kind`]
//! classifies it into the closed [`ErrorKind`] set (sentinel variants first,
//! phrase matching on raw API text second), and [`RetryState::decide`] turns
//! the kind into the `(requeue, delay)` pair the controller feeds its queue:
//!
//! ```rust
//! use cloudflare_tunnel_reconciler::{ErrorKind, RetryState};
//!
//! let mut retry = RetryState::default();
//! let decision = retry.decide(ErrorKind::RateLimited);
//! assert!(decision.requeue);
//! ```
//!
//! Messages destined for CR status fields go through
//! [`sanitize_error_message`] so raw API text cannot leak secrets.
//!
//! ## Concurrency model
//!
//! All operations are sequential remote calls; the crate spawns nothing and
//! sleeps nowhere. Retry timing and per-resource parallelism belong to the
//! controller. A resolver instance must not be shared across concurrent
//! sessions, and reconciliation of one fqdn must be serialized by the caller:
//! the marker check-then-write sequence is best effort, not a distributed
//! lock, because the remote API has no conditional write for these records.
//! Cancellation is cooperative; dropping a future aborts the in-flight
//! request and any partial effect converges on the next attempt.

mod classify;
mod cloudflare;
mod dns;
mod error;
mod resolver;
mod retry;
mod traits;
mod tunnel;
mod types;
mod utils;

#[cfg(test)]
mod test_utils;

pub use classify::{classify, classify_message};
pub use cloudflare::{CloudflareClient, Credentials};
pub use dns::{
    DnsOwnershipReconciler, ManagedRecordStatus, OWNERSHIP_RECORD_PREFIX, RouteOutcome,
    TUNNEL_DOMAIN_SUFFIX,
};
pub use error::{ErrorKind, ReconcileError, Result};
pub use resolver::IdentityResolver;
pub use retry::{
    DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY, DEFAULT_MAX_RETRIES, RetryDecision, RetryState,
};
pub use traits::RemoteResourceClient;
pub use tunnel::{TUNNEL_SECRET_LEN, TunnelLifecycle};
pub use types::{
    Account, AccountRef, ConfigSource, CreateDnsRecordRequest, CreateTunnelParams, DnsRecord,
    OwnershipMarker, Tunnel, TunnelCredentials, TunnelRef, UpdateDnsRecordRequest, Zone, ZoneRef,
};
pub use utils::sanitize::sanitize_error_message;
