use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::str::FromStr;

/// Longest label the domain grammar accepts
const MAX_LABEL_LEN: usize = 63;

/// What the caller declared the query to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    /// IP address lookup
    Ip,
    /// Domain registration lookup
    Domain,
}

impl QueryKind {
    /// The literal used on the wire and on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ip => "ip",
            Self::Domain => "domain",
        }
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryKind {
    type Err = ValidationError;

    /// Only the exact literals `ip` and `domain` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ip" => Ok(Self::Ip),
            "domain" => Ok(Self::Domain),
            other => Err(ValidationError::InvalidKind(other.to_string())),
        }
    }
}

/// A validated lookup query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    raw: String,
    kind: QueryKind,
}

impl Query {
    /// Validate `raw` against an already-parsed kind
    pub fn new(raw: &str, kind: QueryKind) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::MissingQuery);
        }

        match kind {
            QueryKind::Ip => {
                if raw.parse::<IpAddr>().is_err() {
                    return Err(ValidationError::InvalidIp(raw.to_string()));
                }
            }
            QueryKind::Domain => {
                if !is_valid_domain(raw) {
                    return Err(ValidationError::InvalidDomain(raw.to_string()));
                }
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            kind,
        })
    }

    /// Shorthand for an IP query
    pub fn ip(raw: &str) -> Result<Self, ValidationError> {
        Self::new(raw, QueryKind::Ip)
    }

    /// Shorthand for a domain query
    pub fn domain(raw: &str) -> Result<Self, ValidationError> {
        Self::new(raw, QueryKind::Domain)
    }

    /// The query text as supplied (surrounding whitespace removed)
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The declared kind
    #[must_use]
    pub const fn kind(&self) -> QueryKind {
        self.kind
    }

    /// Domain parts of this query; meaningful only for domain queries
    #[must_use]
    pub fn parts(&self) -> DomainParts {
        decompose(&self.raw)
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Validate and classify raw user input.
///
/// `declared_kind` is taken verbatim from the caller; anything other than
/// `ip` or `domain` is rejected before the query itself is looked at.
pub fn classify(raw: &str, declared_kind: &str) -> Result<Query, ValidationError> {
    let kind: QueryKind = declared_kind.parse()?;
    Query::new(raw, kind)
}

/// Top-level and second-level labels of a domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainParts {
    /// Last label, empty for single-label names
    pub tld: String,
    /// Second-to-last label, or the only label
    pub sld: String,
}

/// Split a domain into its top-level and second-level labels.
///
/// ```
/// use ip2whois_core::decompose;
///
/// let parts = decompose("a.b.co.uk");
/// assert_eq!(parts.tld, "uk");
/// assert_eq!(parts.sld, "co");
/// ```
#[must_use]
pub fn decompose(domain: &str) -> DomainParts {
    let lower = domain.to_lowercase();
    let labels: Vec<&str> = lower.split('.').collect();

    match labels.as_slice() {
        [.., sld, tld] => DomainParts {
            tld: (*tld).to_string(),
            sld: (*sld).to_string(),
        },
        [only] => DomainParts {
            tld: String::new(),
            sld: (*only).to_string(),
        },
        [] => DomainParts {
            tld: String::new(),
            sld: String::new(),
        },
    }
}

/// Check the label grammar: at least two labels, each 1-63 ASCII
/// alphanumerics or hyphens, never starting or ending with a hyphen.
#[must_use]
pub fn is_valid_domain(domain: &str) -> bool {
    let mut labels = 0;
    for label in domain.split('.') {
        if !is_valid_label(label) {
            return false;
        }
        labels += 1;
    }
    labels >= 2
}

fn is_valid_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_LABEL_LEN {
        return false;
    }
    if bytes[0] == b'-' || bytes[bytes.len() - 1] == b'-' {
        return false;
    }
    bytes
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || *b == b'-')
}
