//! Provider adapters.
//!
//! Each adapter owns one upstream's request shape and response schema and
//! hands back either a [`CanonicalRecord`] or an [`AdapterFailure`]. Nothing
//! provider-specific leaves this module.

mod ipapi;
mod ipwhois;
mod rdap;
mod whoisxml;

pub use ipapi::IpApiProvider;
pub use ipwhois::IpWhoisProvider;
pub use rdap::RdapProvider;
pub use whoisxml::WhoisXmlProvider;

use crate::LookupClient;
use async_trait::async_trait;
use ip2whois_core::{AdapterFailure, CanonicalRecord, Query, QueryKind};
use std::sync::Arc;
use std::time::Duration;

/// A single upstream lookup source
#[async_trait]
pub trait Provider: Send + Sync {
    /// Name recorded as the `source` of records this provider produces
    fn name(&self) -> &'static str;

    /// Kind of query this provider answers
    fn kind(&self) -> QueryKind;

    /// Wait until the provider may be called, e.g. for a rate-limit slot.
    ///
    /// Not covered by the lookup timeout; call it before every `lookup`.
    async fn ready(&self) {}

    /// Look the query up with exactly one request bounded by `timeout`
    async fn lookup(
        &self,
        query: &Query,
        timeout: Duration,
    ) -> Result<CanonicalRecord, AdapterFailure>;
}

/// Domain providers in priority order: RDAP, WhoisXML API, ipwhois.io
#[must_use]
pub fn domain_chain(client: &LookupClient) -> Vec<Arc<dyn Provider>> {
    vec![
        Arc::new(RdapProvider::new(client.clone())),
        Arc::new(WhoisXmlProvider::new(client.clone())),
        Arc::new(IpWhoisProvider::new(client.clone())),
    ]
}

/// IP providers in priority order: ipapi.co
#[must_use]
pub fn ip_chain(client: &LookupClient) -> Vec<Arc<dyn Provider>> {
    vec![Arc::new(IpApiProvider::new(client.clone()))]
}

/// Reject queries of a kind the provider cannot answer
fn expect_kind(query: &Query, kind: QueryKind) -> Result<(), AdapterFailure> {
    if query.kind() == kind {
        Ok(())
    } else {
        Err(AdapterFailure::Unsupported(query.kind()))
    }
}

/// Treat blank strings the same as missing ones
fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == v.len() {
            Some(v)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Value or sentinel
fn or_sentinel(value: Option<String>, sentinel: &str) -> String {
    non_empty(value).unwrap_or_else(|| sentinel.to_string())
}
