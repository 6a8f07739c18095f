//! IP geolocation and domain registration lookups with ordered provider
//! fallback.
//!
//! Domain queries try RDAP, then WhoisXML API, then ipwhois.io; IP queries
//! go to ipapi.co. Whatever answers first is normalized into one
//! [`CanonicalRecord`] shape. When every provider fails, a best-effort record
//! is derived locally from the query itself, marked with the
//! `"Local Analysis"` source and an explanatory note.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! #[tokio::main]
//! async fn main() -> ip2whois::Result<()> {
//!     let record = ip2whois::resolve("example.com", "domain").await?;
//!     println!("{} answered for {}", record.source(), record.query());
//!
//!     // Reuse one resolver for many lookups
//!     let resolver = ip2whois::Resolver::builder()
//!         .default_providers(&ip2whois::LookupClient::new()?)
//!         .timeout(std::time::Duration::from_secs(3))
//!         .build();
//!     let ip = resolver.resolve("8.8.8.8", "ip").await?;
//!     println!("{:?}", ip.country_code());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/ip2whois/1.0.0")]

// Re-export core types
pub use ip2whois_core::*;

// Re-export client and adapters
pub use ip2whois_client::{
    ClientConfig, Endpoints, IpApiProvider, IpWhoisProvider, LookupClient, LookupClientBuilder,
    Provider, RdapProvider, WhoisXmlProvider, DEFAULT_TIMEOUT_MS,
};

// Re-export resolver
pub use ip2whois_resolver::{Attempt, Resolution, Resolver, ResolverBuilder};

// Re-export runtime for convenience
pub use serde;
pub use serde_json;
pub use tokio;

/// Resolve one query with the default providers and settings.
///
/// Builds a fresh [`Resolver`] per call; hold on to a [`Resolver`] when
/// making more than one lookup.
pub async fn resolve(raw: &str, kind: &str) -> Result<CanonicalRecord> {
    let resolver = Resolver::new()?;
    Ok(resolver.resolve(raw, kind).await?)
}
