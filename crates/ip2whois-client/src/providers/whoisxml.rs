//! WhoisXML API aggregator lookups.

use super::{expect_kind, non_empty, or_sentinel, Provider};
use crate::LookupClient;
use async_trait::async_trait;
use ip2whois_core::countries::country_name;
use ip2whois_core::{
    decompose, normalize_opt_date, AdapterFailure, CanonicalRecord, DomainRecord, DomainStatus,
    Query, QueryKind, Registrant, PRIVACY_PROTECTED, UNKNOWN,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

/// WhoisXML API adapter; second in the domain chain
#[derive(Debug, Clone)]
pub struct WhoisXmlProvider {
    client: LookupClient,
}

impl WhoisXmlProvider {
    const NAME: &'static str = "WhoisXML API";

    /// Create the adapter on top of a shared client
    #[must_use]
    pub const fn new(client: LookupClient) -> Self {
        Self { client }
    }

    fn convert(query: &Query, response: WhoisXmlResponse) -> Result<DomainRecord, AdapterFailure> {
        let record = match (response.whois_record, response.error_message) {
            (Some(record), _) => record,
            (None, Some(error)) => {
                return Err(AdapterFailure::UpstreamRejected {
                    message: non_empty(error.msg)
                        .unwrap_or_else(|| "WhoisXML API reported an error".to_string()),
                })
            }
            (None, None) => {
                return Err(AdapterFailure::MalformedResponse(
                    "response has no WhoisRecord".into(),
                ))
            }
        };

        // Thin registries leave the top level sparse; fall back to the registry copy.
        let registry = *record.registry_data.unwrap_or_default();

        let domain = non_empty(record.domain_name)
            .map_or_else(|| query.as_str().to_string(), |d| d.to_lowercase());
        let parts = decompose(&domain);

        let nameservers = record
            .name_servers
            .or(registry.name_servers)
            .map(|ns| ns.host_names)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|ns| non_empty(Some(ns)))
            .map(|ns| ns.to_lowercase())
            .collect();

        let status = non_empty(record.status)
            .or_else(|| non_empty(registry.status))
            .map_or_else(DomainStatus::default, DomainStatus::Single);

        let registrant = record.registrant.unwrap_or_default();
        let country_code = non_empty(registrant.country_code.clone());

        Ok(DomainRecord {
            registrar: or_sentinel(
                non_empty(record.registrar_name).or(registry.registrar_name),
                UNKNOWN,
            ),
            creation_date: normalize_opt_date(
                record.created_date.or(registry.created_date).as_deref(),
            ),
            expiration_date: normalize_opt_date(
                record.expires_date.or(registry.expires_date).as_deref(),
            ),
            updated_date: normalize_opt_date(
                record.updated_date.or(registry.updated_date).as_deref(),
            ),
            nameservers,
            status,
            dnssec: or_sentinel(record.dnssec, UNKNOWN),
            country_name: country_name(country_code.as_deref()),
            country_code,
            registrant: Registrant {
                name: or_sentinel(registrant.name, PRIVACY_PROTECTED),
                organization: or_sentinel(registrant.organization, UNKNOWN),
                country: or_sentinel(registrant.country_code, UNKNOWN),
                email: or_sentinel(registrant.email, UNKNOWN),
            },
            ..DomainRecord::unknown(domain, parts, Self::NAME)
        })
    }
}

#[async_trait]
impl Provider for WhoisXmlProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> QueryKind {
        QueryKind::Domain
    }

    async fn ready(&self) {
        self.client.acquire().await;
    }

    #[instrument(skip(self), fields(provider = "whoisxml"))]
    async fn lookup(
        &self,
        query: &Query,
        timeout: Duration,
    ) -> Result<CanonicalRecord, AdapterFailure> {
        expect_kind(query, QueryKind::Domain)?;

        let config = self.client.config();
        let url = LookupClient::endpoint(
            &config.endpoints.whoisxml,
            &["whoisserver", "WhoisService"],
            &[
                ("apiKey", config.whoisxml_api_key.as_str()),
                ("domainName", query.as_str()),
                ("outputFormat", "JSON"),
            ],
        )?;

        let response: WhoisXmlResponse = self.client.get_json(url, None, timeout).await?;
        Self::convert(query, response).map(CanonicalRecord::from)
    }
}

// WhoisXML API response types
#[derive(Debug, Deserialize)]
struct WhoisXmlResponse {
    #[serde(default, rename = "WhoisRecord")]
    whois_record: Option<WhoisRecord>,
    #[serde(default, rename = "ErrorMessage")]
    error_message: Option<WhoisXmlError>,
}

#[derive(Debug, Deserialize)]
struct WhoisXmlError {
    #[serde(default)]
    msg: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WhoisRecord {
    #[serde(default)]
    domain_name: Option<String>,
    #[serde(default)]
    registrar_name: Option<String>,
    #[serde(default)]
    created_date: Option<String>,
    #[serde(default)]
    expires_date: Option<String>,
    #[serde(default)]
    updated_date: Option<String>,
    #[serde(default)]
    name_servers: Option<NameServers>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    dnssec: Option<String>,
    #[serde(default)]
    registrant: Option<Contact>,
    #[serde(default)]
    registry_data: Option<Box<WhoisRecord>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NameServers {
    #[serde(default)]
    host_names: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Contact {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    organization: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    email: Option<String>,
}
