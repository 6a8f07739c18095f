//! Network-free records built from the query alone.
//!
//! Used as the last link of every fallback chain, so it must succeed for any
//! validated query.

use crate::countries::{country_name, tld_country};
use crate::types::{
    decompose, CanonicalRecord, DomainRecord, IpRecord, Query, QueryKind, Registrant,
    LOCAL_DOMAIN_NOTE, LOCAL_IP_NOTE, LOCAL_SOURCE, NOT_AVAILABLE,
};

/// Build the degraded record for a query.
#[must_use]
pub fn synthesize(query: &Query) -> CanonicalRecord {
    match query.kind() {
        QueryKind::Ip => synthesize_ip(query.as_str()).into(),
        QueryKind::Domain => synthesize_domain(query.as_str()).into(),
    }
}

/// Degraded IP record: the address and nothing else.
#[must_use]
pub fn synthesize_ip(ip: &str) -> IpRecord {
    IpRecord {
        note: Some(LOCAL_IP_NOTE.to_string()),
        ..IpRecord::bare(ip, LOCAL_SOURCE)
    }
}

/// Degraded domain record: labels, plus a country guessed from a ccTLD.
#[must_use]
pub fn synthesize_domain(domain: &str) -> DomainRecord {
    let parts = decompose(domain);
    let country_code = tld_country(&parts.tld);

    DomainRecord {
        registrar: NOT_AVAILABLE.to_string(),
        country_code: country_code.map(str::to_string),
        country_name: country_name(country_code),
        registrant: Registrant::filled(NOT_AVAILABLE),
        note: Some(LOCAL_DOMAIN_NOTE.to_string()),
        ..DomainRecord::unknown(domain, parts, LOCAL_SOURCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DomainStatus;

    #[test]
    fn test_local_domain_without_country() {
        let record = synthesize(&Query::domain("example.test").unwrap());
        let CanonicalRecord::Domain(d) = &record else {
            panic!("expected a domain record");
        };

        assert_eq!(d.domain, "example.test");
        assert_eq!(d.tld, "test");
        assert_eq!(d.sld, "example");
        assert_eq!(d.source, LOCAL_SOURCE);
        assert_eq!(d.note.as_deref(), Some(LOCAL_DOMAIN_NOTE));
        assert_eq!(d.country_code, None);
        assert_eq!(d.country_name, None);
        assert_eq!(d.registrar, NOT_AVAILABLE);
        assert_eq!(d.registrant.email, NOT_AVAILABLE);
        assert_eq!(d.status, DomainStatus::default());
        assert_eq!(d.dnssec, "Unknown");
        assert!(d.nameservers.is_empty());
        assert!(d.creation_date.is_none());
        assert!(record.is_degraded());
    }

    #[test]
    fn test_local_domain_country_from_cctld() {
        let d = synthesize_domain("bbc.co.uk");
        assert_eq!(d.country_code.as_deref(), Some("GB"));
        assert_eq!(d.country_name.as_deref(), Some("United Kingdom"));
        assert_eq!(d.sld, "co");
    }

    #[test]
    fn test_local_ip() {
        let record = synthesize(&Query::ip("203.0.113.9").unwrap());
        let ip = record.as_ip().unwrap();
        assert_eq!(ip.ip, "203.0.113.9");
        assert_eq!(ip.source, LOCAL_SOURCE);
        assert_eq!(ip.note.as_deref(), Some(LOCAL_IP_NOTE));
        assert!(ip.country_code.is_none());
        assert!(ip.is_tor.is_none());
    }

    #[test]
    fn test_local_records_are_deterministic() {
        let query = Query::domain("example.de").unwrap();
        let a = serde_json::to_string(&synthesize(&query)).unwrap();
        let b = serde_json::to_string(&synthesize(&query)).unwrap();
        assert_eq!(a, b);
    }
}
