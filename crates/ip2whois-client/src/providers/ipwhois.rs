//! ipwhois.io lookups for domains.
//!
//! The service geolocates the domain's address, so only organization and
//! country are meaningful; every registry field stays a sentinel.

use super::{expect_kind, non_empty, or_sentinel, Provider};
use crate::LookupClient;
use async_trait::async_trait;
use ip2whois_core::{
    AdapterFailure, CanonicalRecord, DomainRecord, Query, QueryKind, Registrant, UNKNOWN,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

/// ipwhois.io adapter; last remote link of the domain chain
#[derive(Debug, Clone)]
pub struct IpWhoisProvider {
    client: LookupClient,
}

impl IpWhoisProvider {
    const NAME: &'static str = "ipwhois.io";

    /// Create the adapter on top of a shared client
    #[must_use]
    pub const fn new(client: LookupClient) -> Self {
        Self { client }
    }

    fn convert(query: &Query, response: IpWhoisResponse) -> Result<DomainRecord, AdapterFailure> {
        if response.success == Some(false) {
            return Err(AdapterFailure::UpstreamRejected {
                message: non_empty(response.message)
                    .unwrap_or_else(|| "Domain lookup failed".to_string()),
            });
        }

        let country_name = non_empty(response.country);
        Ok(DomainRecord {
            country_code: non_empty(response.country_code),
            registrant: Registrant {
                organization: or_sentinel(response.org, UNKNOWN),
                country: or_sentinel(country_name.clone(), UNKNOWN),
                ..Registrant::default()
            },
            country_name,
            ..DomainRecord::unknown(query.as_str(), query.parts(), Self::NAME)
        })
    }
}

#[async_trait]
impl Provider for IpWhoisProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> QueryKind {
        QueryKind::Domain
    }

    async fn ready(&self) {
        self.client.acquire().await;
    }

    #[instrument(skip(self), fields(provider = "ipwhois"))]
    async fn lookup(
        &self,
        query: &Query,
        timeout: Duration,
    ) -> Result<CanonicalRecord, AdapterFailure> {
        expect_kind(query, QueryKind::Domain)?;

        let url = LookupClient::endpoint(
            &self.client.config().endpoints.ipwhois,
            &["json", query.as_str()],
            &[("lang", "en")],
        )?;

        let response: IpWhoisResponse = self.client.get_json(url, None, timeout).await?;
        Self::convert(query, response).map(CanonicalRecord::from)
    }
}

// ipwhois.io response types
#[derive(Debug, Deserialize)]
struct IpWhoisResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    org: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ip2whois_core::DomainStatus;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> IpWhoisResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_convert_coarse_data() {
        let query = Query::domain("example.com").unwrap();
        let payload = json!({
            "ip": "93.184.216.34",
            "success": true,
            "country": "United States",
            "country_code": "US",
            "org": "Edgecast Inc."
        });

        let record = IpWhoisProvider::convert(&query, parse(payload)).unwrap();
        assert_eq!(record.source, "ipwhois.io");
        assert_eq!(record.country_code.as_deref(), Some("US"));
        assert_eq!(record.country_name.as_deref(), Some("United States"));
        assert_eq!(record.registrant.organization, "Edgecast Inc.");
        assert_eq!(record.registrant.country, "United States");
        assert_eq!(record.registrant.name, UNKNOWN);
        assert_eq!(record.registrant.email, UNKNOWN);
        assert_eq!(record.registrar, UNKNOWN);
        assert_eq!(record.dnssec, UNKNOWN);
        assert_eq!(record.status, DomainStatus::default());
        assert!(record.nameservers.is_empty());
        assert!(record.creation_date.is_none());
        assert!(record.expiration_date.is_none());
    }

    #[test]
    fn test_success_false_is_rejection() {
        let query = Query::domain("nope.invalid").unwrap();
        let payload = json!({"success": false, "message": "Invalid IP address"});
        let err = IpWhoisProvider::convert(&query, parse(payload)).unwrap_err();
        assert_eq!(
            err,
            AdapterFailure::UpstreamRejected {
                message: "Invalid IP address".into()
            }
        );

        let err = IpWhoisProvider::convert(&query, parse(json!({"success": false}))).unwrap_err();
        assert_eq!(
            err,
            AdapterFailure::UpstreamRejected {
                message: "Domain lookup failed".into()
            }
        );
    }
}
