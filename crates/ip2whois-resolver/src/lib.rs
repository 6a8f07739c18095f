//! Ordered provider fallback for ip2whois lookups.
//!
//! A [`Resolver`] validates the raw query, then walks the provider chain for
//! its kind strictly in order. The first provider that produces a record wins;
//! when every provider fails the record is synthesized locally, so a valid
//! query always resolves.
//!
//! ```no_run
//! use ip2whois_resolver::Resolver;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = Resolver::new()?;
//! let record = resolver.resolve("example.com", "domain").await?;
//! println!("{} via {}", record.query(), record.source());
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/ip2whois-resolver/1.0.0")]

mod attempt;
mod resolver;

pub use attempt::{Attempt, Resolution};
pub use ip2whois_client::Provider;
pub use resolver::{Resolver, ResolverBuilder, DEFAULT_TIMEOUT};
