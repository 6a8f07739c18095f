//! Registration Data Access Protocol lookups via a bootstrap service.

use super::{expect_kind, non_empty, or_sentinel, Provider};
use crate::LookupClient;
use async_trait::async_trait;
use ip2whois_core::countries::country_name;
use ip2whois_core::{
    normalize_opt_date, AdapterFailure, CanonicalRecord, DomainRecord, DomainStatus, Query,
    QueryKind, Registrant, PRIVACY_PROTECTED, UNKNOWN,
};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

const RDAP_MEDIA_TYPE: &str = "application/rdap+json";

/// Index of the country component inside a vCard `adr` value
const ADR_COUNTRY: usize = 6;

/// RDAP adapter; first in the domain chain
#[derive(Debug, Clone)]
pub struct RdapProvider {
    client: LookupClient,
}

impl RdapProvider {
    /// Create the adapter on top of a shared client
    #[must_use]
    pub const fn new(client: LookupClient) -> Self {
        Self { client }
    }

    const NAME: &'static str = "RDAP";

    /// Convert an RDAP domain object into a canonical record
    fn convert(query: &Query, domain: RdapDomain) -> Result<DomainRecord, AdapterFailure> {
        if let Some(code) = domain.error_code {
            let message = domain
                .title
                .or_else(|| domain.description.into_iter().next())
                .unwrap_or_else(|| format!("RDAP error {code}"));
            return Err(AdapterFailure::UpstreamRejected { message });
        }

        if let Some(class) = domain.object_class_name.as_deref() {
            if class != "domain" {
                return Err(AdapterFailure::MalformedResponse(format!(
                    "expected a domain object, got {class}"
                )));
            }
        }

        let event_date = |action: &str| {
            domain
                .events
                .iter()
                .find(|e| e.event_action == action)
                .and_then(|e| normalize_opt_date(e.event_date.as_deref()))
        };

        let registrar = domain.entity_with_role("registrar").and_then(|entity| {
            non_empty(entity.vcard_text("fn")).or_else(|| non_empty(entity.handle.clone()))
        });

        let registrant = domain.entity_with_role("registrant");
        let registrant = Registrant {
            name: or_sentinel(registrant.and_then(|e| e.vcard_text("fn")), PRIVACY_PROTECTED),
            organization: or_sentinel(registrant.and_then(|e| e.vcard_text("org")), UNKNOWN),
            country: or_sentinel(registrant.and_then(RdapEntity::vcard_country), UNKNOWN),
            email: or_sentinel(registrant.and_then(|e| e.vcard_text("email")), UNKNOWN),
        };

        let country_code = (registrant.country != UNKNOWN).then(|| registrant.country.clone());

        let nameservers = domain
            .nameservers
            .iter()
            .filter_map(|ns| non_empty(ns.ldh_name.clone()))
            .map(|ns| ns.to_lowercase())
            .collect();

        let dnssec = if domain
            .secure_dns
            .as_ref()
            .and_then(|s| s.delegation_signed)
            .unwrap_or(false)
        {
            "Signed"
        } else {
            "Unsigned"
        };

        Ok(DomainRecord {
            registrar: registrar.unwrap_or_else(|| UNKNOWN.to_string()),
            creation_date: event_date("registration"),
            expiration_date: event_date("expiration"),
            updated_date: event_date("last update"),
            nameservers,
            status: DomainStatus::from_list(domain.status.clone()),
            dnssec: dnssec.to_string(),
            country_name: country_name(country_code.as_deref()),
            country_code,
            registrant,
            ..DomainRecord::unknown(query.as_str(), query.parts(), Self::NAME)
        })
    }
}

#[async_trait]
impl Provider for RdapProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> QueryKind {
        QueryKind::Domain
    }

    async fn ready(&self) {
        self.client.acquire().await;
    }

    #[instrument(skip(self), fields(provider = "rdap"))]
    async fn lookup(
        &self,
        query: &Query,
        timeout: Duration,
    ) -> Result<CanonicalRecord, AdapterFailure> {
        expect_kind(query, QueryKind::Domain)?;

        let url = LookupClient::endpoint(
            &self.client.config().endpoints.rdap,
            &["domain", query.as_str()],
            &[],
        )?;

        let domain: RdapDomain = self
            .client
            .get_json(url, Some(RDAP_MEDIA_TYPE), timeout)
            .await?;
        debug!(entities = domain.entities.len(), "RDAP response");

        Self::convert(query, domain).map(CanonicalRecord::from)
    }
}

// RDAP response types (RFC 9083)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RdapDomain {
    #[serde(default)]
    object_class_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    nameservers: Vec<RdapNameserver>,
    #[serde(default, deserialize_with = "null_as_empty")]
    events: Vec<RdapEvent>,
    #[serde(default, deserialize_with = "null_as_empty")]
    entities: Vec<RdapEntity>,
    #[serde(default, deserialize_with = "null_as_empty")]
    status: Vec<String>,
    #[serde(default, rename = "secureDNS")]
    secure_dns: Option<RdapSecureDns>,
    #[serde(default)]
    error_code: Option<u16>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    description: Vec<String>,
}

/// Registries send `null` for empty arrays as often as they omit them
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl RdapDomain {
    /// First entity carrying `role`
    fn entity_with_role(&self, role: &str) -> Option<&RdapEntity> {
        self.entities
            .iter()
            .find(|e| e.roles.iter().any(|r| r.eq_ignore_ascii_case(role)))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RdapNameserver {
    #[serde(default)]
    ldh_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RdapEvent {
    event_action: String,
    #[serde(default)]
    event_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RdapSecureDns {
    #[serde(default)]
    delegation_signed: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RdapEntity {
    #[serde(default, deserialize_with = "null_as_empty")]
    roles: Vec<String>,
    #[serde(default)]
    handle: Option<String>,
    /// jCard: `["vcard", [[name, params, type, value, ...], ...]]`
    #[serde(default)]
    vcard_array: Option<Value>,
}

impl RdapEntity {
    /// First vCard property called `name`
    fn vcard_property(&self, name: &str) -> Option<&Value> {
        self.vcard_array
            .as_ref()?
            .get(1)?
            .as_array()?
            .iter()
            .find(|prop| prop.get(0).and_then(Value::as_str) == Some(name))
    }

    /// Value of the first vCard property called `name`
    fn vcard_value(&self, name: &str) -> Option<&Value> {
        self.vcard_property(name)?.get(3)
    }

    /// Text value of a vCard property; structured values yield their first
    /// non-empty component
    fn vcard_text(&self, name: &str) -> Option<String> {
        match self.vcard_value(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Array(parts) => parts
                .iter()
                .filter_map(Value::as_str)
                .find(|s| !s.is_empty())
                .map(str::to_string),
            _ => None,
        }
    }

    /// Country of the vCard address: the `cc` parameter when present,
    /// otherwise the country component of the structured value
    fn vcard_country(&self) -> Option<String> {
        let adr = self.vcard_property("adr")?;
        let from_param = adr
            .get(1)
            .and_then(|params| params.get("cc"))
            .and_then(Value::as_str)
            .filter(|cc| !cc.trim().is_empty())
            .map(str::to_uppercase);

        from_param.or_else(|| {
            adr.get(3)?
                .get(ADR_COUNTRY)?
                .as_str()
                .map(str::to_string)
        })
    }
}
