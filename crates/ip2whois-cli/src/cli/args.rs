//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// IP geolocation and domain registration lookups
///
/// Domains are tried against RDAP, WhoisXML API and ipwhois.io in turn; IP
/// addresses against ipapi.co. If every provider fails, a best-effort record
/// is derived locally and marked "Local Analysis".
#[derive(Parser, Debug)]
#[command(name = "ip2whois")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Per-provider timeout in milliseconds
    #[arg(long, global = true, env = "IP2WHOIS_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Show which providers were tried
    #[arg(long, global = true)]
    pub attempts: bool,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Geolocate an IPv4 or IPv6 address
    Ip(IpArgs),

    /// Look up registration data for a domain
    Domain(DomainArgs),

    /// Look up a query with an explicit type
    Lookup(LookupArgs),

    /// Resolve every query listed in a file
    Batch(BatchArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Lookup commands
// ============================================================================

#[derive(Args, Debug)]
pub struct IpArgs {
    /// IP address to look up
    pub address: String,
}

#[derive(Args, Debug)]
pub struct DomainArgs {
    /// Domain name to look up (e.g., example.com)
    pub name: String,
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// IP address or domain name
    pub query: String,

    /// Query type: "ip" or "domain"
    #[arg(short = 't', long = "type")]
    pub kind: String,
}

// ============================================================================
// Batch command
// ============================================================================

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// File with one "<type> <query>" pair per line ("-" for stdin)
    pub file: PathBuf,

    /// Maximum number of queries resolved at once
    #[arg(short, long, default_value = "8")]
    pub concurrency: usize,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Key to set (e.g., timeout_ms, output_format, endpoints.rdap)
        key: String,

        /// Value to set
        value: String,
    },

    /// Restore the default configuration
    Reset,

    /// Show config file path
    Path,
}
