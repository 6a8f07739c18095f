//! Configuration management.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use ip2whois::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "IP2WHOIS_CONFIG";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default output format.
    pub output_format: Option<OutputFormat>,

    /// Provider client settings.
    #[serde(default)]
    pub resolver: ClientConfig,
}

impl Config {
    /// Get the config file path.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        let dirs = ProjectDirs::from("io", "ip2whois", "ip2whois")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from file.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Apply a `config set` assignment.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let resolver = &mut self.resolver;
        match key {
            "output_format" | "output" => self.output_format = Some(value.parse()?),
            "timeout_ms" | "timeout" => resolver.timeout_ms = value.parse()?,
            "user_agent" => resolver.user_agent = value.to_string(),
            "whoisxml_api_key" => resolver.whoisxml_api_key = value.to_string(),
            "requests_per_second" | "rps" => {
                resolver.requests_per_second = match value {
                    "" | "none" | "off" => None,
                    n => Some(n.parse()?),
                };
            }
            "endpoints.rdap" => resolver.endpoints.rdap = value.to_string(),
            "endpoints.whoisxml" => resolver.endpoints.whoisxml = value.to_string(),
            "endpoints.ipwhois" => resolver.endpoints.ipwhois = value.to_string(),
            "endpoints.ipapi" => resolver.endpoints.ipapi = value.to_string(),
            _ => anyhow::bail!(
                "Unknown config key: {key}\n\n\
                 Available keys:\n  \
                 output_format        - Default output format (pretty/json/yaml)\n  \
                 timeout_ms           - Per-provider timeout in milliseconds\n  \
                 user_agent           - User-Agent sent to providers\n  \
                 whoisxml_api_key     - WhoisXML API key\n  \
                 requests_per_second  - Outbound rate limit (or \"none\")\n  \
                 endpoints.<provider> - Base URL for rdap/whoisxml/ipwhois/ipapi"
            ),
        }

        self.resolver.validate()?;
        Ok(())
    }
}
