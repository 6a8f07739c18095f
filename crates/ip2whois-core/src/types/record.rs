use super::query::{DomainParts, QueryKind};
use serde::{Deserialize, Serialize};

/// Placeholder for a field a provider does not expose
pub const UNKNOWN: &str = "Unknown";

/// Placeholder used by local analysis, where nothing was looked up at all
pub const NOT_AVAILABLE: &str = "Information not available";

/// Registrant name shown when the registry redacts it
pub const PRIVACY_PROTECTED: &str = "Privacy Protected";

/// Source tag for records synthesized without any provider
pub const LOCAL_SOURCE: &str = "Local Analysis";

/// Note attached to local domain records
pub const LOCAL_DOMAIN_NOTE: &str =
    "Limited information available. Using local domain analysis only.";

/// Note attached to local IP records
pub const LOCAL_IP_NOTE: &str = "Limited information available. External API lookup failed.";

/// The unified lookup result, shaped by the kind of query that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanonicalRecord {
    /// Result of an IP lookup
    Ip(IpRecord),
    /// Result of a domain lookup
    Domain(DomainRecord),
}

impl CanonicalRecord {
    /// Name of the provider that produced the record
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Ip(r) => &r.source,
            Self::Domain(r) => &r.source,
        }
    }

    /// Degradation note, if any
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        match self {
            Self::Ip(r) => r.note.as_deref(),
            Self::Domain(r) => r.note.as_deref(),
        }
    }

    /// Returns true if no remote provider contributed to the record
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.source() == LOCAL_SOURCE
    }

    /// The IP address or domain the record describes
    #[must_use]
    pub fn query(&self) -> &str {
        match self {
            Self::Ip(r) => &r.ip,
            Self::Domain(r) => &r.domain,
        }
    }

    /// Kind of query the record answers
    #[must_use]
    pub const fn kind(&self) -> QueryKind {
        match self {
            Self::Ip(_) => QueryKind::Ip,
            Self::Domain(_) => QueryKind::Domain,
        }
    }

    /// Two-letter country code if known
    #[must_use]
    pub fn country_code(&self) -> Option<&str> {
        match self {
            Self::Ip(r) => r.country_code.as_deref(),
            Self::Domain(r) => r.country_code.as_deref(),
        }
    }

    /// Borrow the IP record, if this is one
    #[must_use]
    pub const fn as_ip(&self) -> Option<&IpRecord> {
        match self {
            Self::Ip(r) => Some(r),
            Self::Domain(_) => None,
        }
    }

    /// Borrow the domain record, if this is one
    #[must_use]
    pub const fn as_domain(&self) -> Option<&DomainRecord> {
        match self {
            Self::Domain(r) => Some(r),
            Self::Ip(_) => None,
        }
    }
}

impl From<IpRecord> for CanonicalRecord {
    fn from(record: IpRecord) -> Self {
        Self::Ip(record)
    }
}

impl From<DomainRecord> for CanonicalRecord {
    fn from(record: DomainRecord) -> Self {
        Self::Domain(record)
    }
}

/// Geolocation and network ownership of an IP address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpRecord {
    /// The address looked up
    pub ip: String,
    /// Two-letter country code (ISO 3166-1 alpha-2)
    pub country_code: Option<String>,
    /// Full country name
    pub country_name: Option<String>,
    /// Region or state
    pub region: Option<String>,
    /// City name
    pub city: Option<String>,
    /// Postal/ZIP code
    pub postal_code: Option<String>,
    /// Latitude coordinate
    pub latitude: Option<f64>,
    /// Longitude coordinate
    pub longitude: Option<f64>,
    /// IANA timezone name
    pub timezone: Option<String>,
    /// Autonomous system number, e.g. `AS15169`
    pub asn: Option<String>,
    /// Organization owning the address
    pub org: Option<String>,
    /// Internet service provider
    pub isp: Option<String>,
    /// Enclosing network in CIDR notation
    pub network: Option<String>,
    /// Known proxy; `None` means the provider did not say
    pub is_proxy: Option<bool>,
    /// Known Tor exit; `None` means the provider did not say
    pub is_tor: Option<bool>,
    /// Known VPN endpoint; `None` means the provider did not say
    pub is_vpn: Option<bool>,
    /// Provider that produced the record
    pub source: String,
    /// Present only on degraded records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl IpRecord {
    /// A record carrying only the address; every looked-up field is unknown
    #[must_use]
    pub fn bare(ip: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            country_code: None,
            country_name: None,
            region: None,
            city: None,
            postal_code: None,
            latitude: None,
            longitude: None,
            timezone: None,
            asn: None,
            org: None,
            isp: None,
            network: None,
            is_proxy: None,
            is_tor: None,
            is_vpn: None,
            source: source.into(),
            note: None,
        }
    }

    /// Returns the coordinates as a tuple if available
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Registration data for a domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRecord {
    /// The domain looked up
    pub domain: String,
    /// Top-level label
    pub tld: String,
    /// Second-level label
    pub sld: String,
    /// Sponsoring registrar
    pub registrar: String,
    /// Registration date (ISO 8601)
    pub creation_date: Option<String>,
    /// Expiration date (ISO 8601)
    pub expiration_date: Option<String>,
    /// Last update date (ISO 8601)
    pub updated_date: Option<String>,
    /// Delegated nameservers
    pub nameservers: Vec<String>,
    /// EPP status codes
    pub status: DomainStatus,
    /// `Signed`, `Unsigned`, or whatever the provider reports
    pub dnssec: String,
    /// Two-letter country code if known
    pub country_code: Option<String>,
    /// Full country name if known
    pub country_name: Option<String>,
    /// Registrant contact
    pub registrant: Registrant,
    /// Provider that produced the record
    pub source: String,
    /// Present only on degraded records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DomainRecord {
    /// A record for `domain` with every registry field set to [`UNKNOWN`]
    #[must_use]
    pub fn unknown(domain: impl Into<String>, parts: DomainParts, source: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            tld: parts.tld,
            sld: parts.sld,
            registrar: UNKNOWN.to_string(),
            creation_date: None,
            expiration_date: None,
            updated_date: None,
            nameservers: Vec::new(),
            status: DomainStatus::default(),
            dnssec: UNKNOWN.to_string(),
            country_code: None,
            country_name: None,
            registrant: Registrant::default(),
            source: source.into(),
            note: None,
        }
    }
}

/// Domain status as reported: a single value or a list of EPP codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DomainStatus {
    /// Single status string, [`UNKNOWN`] when absent
    Single(String),
    /// One entry per EPP status code
    List(Vec<String>),
}

impl DomainStatus {
    /// Build from a list, falling back to the sentinel when it is empty
    #[must_use]
    pub fn from_list(list: Vec<String>) -> Self {
        if list.is_empty() {
            Self::default()
        } else {
            Self::List(list)
        }
    }

    /// Status values as a slice-like list
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(s) => vec![s.as_str()],
            Self::List(list) => list.iter().map(String::as_str).collect(),
        }
    }
}

impl Default for DomainStatus {
    fn default() -> Self {
        Self::Single(UNKNOWN.to_string())
    }
}

impl std::fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.values().join(", "))
    }
}

/// Registrant contact; every field holds a value or a sentinel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registrant {
    /// Contact name
    pub name: String,
    /// Organization
    pub organization: String,
    /// Country
    pub country: String,
    /// Contact email
    pub email: String,
}

impl Registrant {
    /// Every field set to the same placeholder
    #[must_use]
    pub fn filled(placeholder: &str) -> Self {
        Self {
            name: placeholder.to_string(),
            organization: placeholder.to_string(),
            country: placeholder.to_string(),
            email: placeholder.to_string(),
        }
    }
}

impl Default for Registrant {
    fn default() -> Self {
        Self::filled(UNKNOWN)
    }
}
