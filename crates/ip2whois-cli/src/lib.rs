//! # ip2whois-cli
//!
//! Command-line interface for ip2whois lookups.
//!
//! ## Features
//!
//! - **Lookups**: `ip`, `domain` and `lookup --type` for free-form kinds
//! - **Batch mode**: resolve a file of `kind query` lines concurrently
//! - **Attempt log**: `--attempts` shows which providers were tried
//! - **Multiple output formats**: Pretty tables, JSON, YAML

pub mod cli;
pub mod config;
pub mod logging;
pub mod output;

pub use cli::run;
