//! Client configuration types.

use ip2whois_core::LookupError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-provider request timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Base URLs for every upstream provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// RDAP bootstrap service; redirects to the authoritative registry
    #[serde(default = "default_rdap")]
    pub rdap: String,

    /// WhoisXML API
    #[serde(default = "default_whoisxml")]
    pub whoisxml: String,

    /// ipwhois.io
    #[serde(default = "default_ipwhois")]
    pub ipwhois: String,

    /// ipapi.co
    #[serde(default = "default_ipapi")]
    pub ipapi: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            rdap: default_rdap(),
            whoisxml: default_whoisxml(),
            ipwhois: default_ipwhois(),
            ipapi: default_ipapi(),
        }
    }
}

impl Endpoints {
    /// Point every provider at the same base URL (useful for testing)
    #[must_use]
    pub fn all(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            rdap: base.clone(),
            whoisxml: base.clone(),
            ipwhois: base.clone(),
            ipapi: base,
        }
    }
}

/// Settings shared by all provider adapters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Timeout for a single provider call, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// API key for WhoisXML API
    #[serde(default = "default_whoisxml_api_key")]
    pub whoisxml_api_key: String,

    /// Optional cap on outbound requests per second
    #[serde(default)]
    pub requests_per_second: Option<u32>,

    /// Provider base URLs
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            whoisxml_api_key: default_whoisxml_api_key(),
            requests_per_second: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl ClientConfig {
    /// Per-provider timeout as a [`Duration`]
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check values that would otherwise fail on first use
    pub fn validate(&self) -> Result<(), LookupError> {
        if self.timeout_ms == 0 {
            return Err(LookupError::Config("timeout_ms must be greater than zero".into()));
        }
        if self.requests_per_second == Some(0) {
            return Err(LookupError::Config(
                "requests_per_second must be greater than zero".into(),
            ));
        }

        let endpoints = [
            ("rdap", &self.endpoints.rdap),
            ("whoisxml", &self.endpoints.whoisxml),
            ("ipwhois", &self.endpoints.ipwhois),
            ("ipapi", &self.endpoints.ipapi),
        ];
        for (name, base) in endpoints {
            let url = url::Url::parse(base)
                .map_err(|e| LookupError::Config(format!("invalid {name} endpoint {base}: {e}")))?;
            if url.cannot_be_a_base() {
                return Err(LookupError::Config(format!(
                    "invalid {name} endpoint {base}: not a base URL"
                )));
            }
        }

        Ok(())
    }
}

// Default value functions for serde.
const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_user_agent() -> String {
    format!("ip2whois/{}", env!("CARGO_PKG_VERSION"))
}

fn default_whoisxml_api_key() -> String {
    String::from("at_demo")
}

fn default_rdap() -> String {
    String::from("https://rdap.org")
}

fn default_whoisxml() -> String {
    String::from("https://www.whoisxmlapi.com")
}

fn default_ipwhois() -> String {
    String::from("https://ipwhois.io")
}

fn default_ipapi() -> String {
    String::from("https://ipapi.co")
}
