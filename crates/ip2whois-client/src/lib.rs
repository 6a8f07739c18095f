//! HTTP client and provider adapters for the ip2whois resolver.
//!
//! This crate provides the shared [`LookupClient`] and one [`Provider`] per
//! upstream source. Adapters translate each provider's response schema into
//! the [`CanonicalRecord`](ip2whois_core::CanonicalRecord) and report
//! everything else as an [`AdapterFailure`](ip2whois_core::AdapterFailure).

#![doc(html_root_url = "https://docs.rs/ip2whois-client/1.0.0")]

mod client;
mod config;
pub mod providers;

pub use client::{LookupClient, LookupClientBuilder};
pub use config::*;
pub use providers::{
    domain_chain, ip_chain, IpApiProvider, IpWhoisProvider, Provider, RdapProvider,
    WhoisXmlProvider,
};
