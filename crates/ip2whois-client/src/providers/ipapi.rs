//! ipapi.co geolocation lookups for IP addresses.

use super::{expect_kind, non_empty, Provider};
use crate::LookupClient;
use async_trait::async_trait;
use ip2whois_core::{AdapterFailure, CanonicalRecord, IpRecord, Query, QueryKind};
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

/// ipapi.co adapter; the whole IP chain
#[derive(Debug, Clone)]
pub struct IpApiProvider {
    client: LookupClient,
}

impl IpApiProvider {
    const NAME: &'static str = "ipapi.co";

    /// Create the adapter on top of a shared client
    #[must_use]
    pub const fn new(client: LookupClient) -> Self {
        Self { client }
    }

    /// Map the payload 1:1.
    ///
    /// The free tier has no ISP or security data: `isp` mirrors `org`, and the
    /// proxy/Tor/VPN flags stay unknown rather than being reported as false.
    fn convert(query: &Query, response: IpApiResponse) -> Result<IpRecord, AdapterFailure> {
        if response.error.unwrap_or(false) {
            return Err(AdapterFailure::UpstreamRejected {
                message: non_empty(response.reason)
                    .unwrap_or_else(|| "Invalid IP address".to_string()),
            });
        }

        let org = non_empty(response.org);
        Ok(IpRecord {
            ip: non_empty(response.ip).unwrap_or_else(|| query.as_str().to_string()),
            country_code: non_empty(response.country_code),
            country_name: non_empty(response.country_name),
            region: non_empty(response.region),
            city: non_empty(response.city),
            postal_code: non_empty(response.postal),
            latitude: response.latitude,
            longitude: response.longitude,
            timezone: non_empty(response.timezone),
            asn: non_empty(response.asn),
            isp: org.clone(),
            org,
            network: non_empty(response.network),
            ..IpRecord::bare(query.as_str(), Self::NAME)
        })
    }
}

#[async_trait]
impl Provider for IpApiProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> QueryKind {
        QueryKind::Ip
    }

    async fn ready(&self) {
        self.client.acquire().await;
    }

    #[instrument(skip(self), fields(provider = "ipapi"))]
    async fn lookup(
        &self,
        query: &Query,
        timeout: Duration,
    ) -> Result<CanonicalRecord, AdapterFailure> {
        expect_kind(query, QueryKind::Ip)?;

        let url = LookupClient::endpoint(
            &self.client.config().endpoints.ipapi,
            &[query.as_str(), "json", ""],
            &[],
        )?;

        let response: IpApiResponse = self.client.get_json(url, None, timeout).await?;
        Self::convert(query, response).map(CanonicalRecord::from)
    }
}

// ipapi.co response types
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    #[serde(default)]
    ip: Option<String>,
    #[serde(default)]
    error: Option<bool>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    country_name: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    postal: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    asn: Option<String>,
    #[serde(default)]
    org: Option<String>,
    #[serde(default)]
    network: Option<String>,
}
