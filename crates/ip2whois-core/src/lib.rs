//! Core types for the ip2whois resolver.
//!
//! This crate holds everything that does not touch the network:
//!
//! - **Types**: the validated [`Query`] and the provider-agnostic [`CanonicalRecord`]
//! - **Validation**: [`classify`] and the domain label grammar
//! - **Local analysis**: [`synthesize`], the record of last resort
//! - **Errors**: [`ValidationError`], [`AdapterFailure`] and [`LookupError`]
//!
//! # Example
//!
//! ```rust
//! use ip2whois_core::{classify, synthesize, QueryKind};
//!
//! let query = classify("example.test", "domain").unwrap();
//! assert_eq!(query.kind(), QueryKind::Domain);
//!
//! let record = synthesize(&query);
//! assert_eq!(record.source(), "Local Analysis");
//! ```

#![doc(html_root_url = "https://docs.rs/ip2whois-core/1.0.0")]

pub mod countries;
mod error;
pub mod local;
pub mod types;

pub use error::{AdapterFailure, LookupError, Result, ValidationError};
pub use local::synthesize;
pub use types::*;
