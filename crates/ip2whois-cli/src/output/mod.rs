//! Output formatting for different formats.

use clap::ValueEnum;
use colored::Colorize;
use ip2whois::{Attempt, CanonicalRecord, DomainRecord, IpRecord, Resolution};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tabled::{settings::Style, Table, Tabled};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed tables with colors
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "table" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => anyhow::bail!(
                "Unknown output format: {s}\n\
                 Valid formats: pretty, json, yaml"
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// One row of the attempt log.
#[derive(Debug, Serialize, Tabled)]
pub struct AttemptRow {
    #[tabled(rename = "Provider")]
    pub provider: &'static str,
    #[tabled(rename = "Outcome")]
    pub outcome: String,
    #[tabled(rename = "Elapsed (ms)")]
    pub elapsed_ms: u64,
}

impl From<&Attempt> for AttemptRow {
    fn from(attempt: &Attempt) -> Self {
        Self {
            provider: attempt.provider,
            outcome: attempt
                .failure
                .as_ref()
                .map_or_else(|| "ok".to_string(), ToString::to_string),
            elapsed_ms: u64::try_from(attempt.elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// A record serialized together with its attempt log.
#[derive(Serialize)]
pub struct TracedView<'a> {
    record: &'a CanonicalRecord,
    attempts: Vec<AttemptRow>,
}

impl<'a> TracedView<'a> {
    pub fn new(resolution: &'a Resolution) -> Self {
        Self {
            record: &resolution.record,
            attempts: resolution.attempts.iter().map(AttemptRow::from).collect(),
        }
    }
}

/// Render a resolution in the requested format.
///
/// JSON and YAML emit the record exactly as serialized; with `attempts` the
/// record is wrapped together with the attempt log.
pub fn render(format: OutputFormat, resolution: &Resolution, attempts: bool) -> anyhow::Result<String> {
    let record = &resolution.record;

    match format {
        OutputFormat::Json if attempts => {
            Ok(serde_json::to_string_pretty(&TracedView::new(resolution))?)
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Yaml if attempts => Ok(serde_yaml::to_string(&TracedView::new(resolution))?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(record)?),
        OutputFormat::Pretty => {
            let mut out = pretty_record(record);
            if attempts && !resolution.attempts.is_empty() {
                let rows = resolution.attempts.iter().map(AttemptRow::from);
                out.push('\n');
                out.push_str(&format!("{}\n", "Attempts:".bold().underline()));
                out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
                out.push('\n');
            }
            Ok(out)
        }
    }
}

/// Human-readable record with a trailing provenance line.
pub fn pretty_record(record: &CanonicalRecord) -> String {
    let mut out = match record {
        CanonicalRecord::Ip(ip) => pretty_ip(ip),
        CanonicalRecord::Domain(domain) => pretty_domain(domain),
    };

    out.push('\n');
    let source = if record.is_degraded() {
        record.source().yellow().bold()
    } else {
        record.source().green().bold()
    };
    out.push_str(&format!("{} {}\n", "Source:".dimmed(), source));
    if let Some(note) = record.note() {
        out.push_str(&format!("{} {}\n", "Note:".dimmed(), note.yellow()));
    }
    out
}

fn field(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        out.push_str(&format!("  {} {}\n", format!("{label}:").bold(), value));
    }
}

fn pretty_ip(ip: &IpRecord) -> String {
    let mut out = format!("{} {}\n\n", "IP:".bold(), ip.ip.cyan().bold());

    let location = [ip.city.as_deref(), ip.region.as_deref(), ip.country_name.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
    field(&mut out, "Location", (!location.is_empty()).then_some(location.as_str()));
    field(&mut out, "Country code", ip.country_code.as_deref());
    field(&mut out, "Postal code", ip.postal_code.as_deref());
    let coordinates = ip.coordinates().map(|(lat, lon)| format!("{lat}, {lon}"));
    field(&mut out, "Coordinates", coordinates.as_deref());
    field(&mut out, "Timezone", ip.timezone.as_deref());
    field(&mut out, "ASN", ip.asn.as_deref());
    field(&mut out, "Organization", ip.org.as_deref());
    field(&mut out, "ISP", ip.isp.as_deref());
    field(&mut out, "Network", ip.network.as_deref());

    let flags = [("proxy", ip.is_proxy), ("tor", ip.is_tor), ("vpn", ip.is_vpn)];
    let known: Vec<_> = flags
        .iter()
        .filter_map(|(name, flag)| flag.map(|f| format!("{name}={f}")))
        .collect();
    if !known.is_empty() {
        field(&mut out, "Security", Some(&known.join(" ")));
    }
    out
}

fn pretty_domain(domain: &DomainRecord) -> String {
    let mut out = format!("{} {}\n\n", "Domain:".bold(), domain.domain.cyan().bold());

    field(&mut out, "Registrar", Some(&domain.registrar));
    field(&mut out, "Created", domain.creation_date.as_deref());
    field(&mut out, "Expires", domain.expiration_date.as_deref());
    field(&mut out, "Updated", domain.updated_date.as_deref());
    field(&mut out, "Status", Some(&domain.status.to_string()));
    field(&mut out, "DNSSEC", Some(&domain.dnssec));
    let country = match (&domain.country_name, &domain.country_code) {
        (Some(name), Some(code)) if name != code => Some(format!("{name} ({code})")),
        (_, Some(code)) => Some(code.clone()),
        (Some(name), None) => Some(name.clone()),
        (None, None) => None,
    };
    field(&mut out, "Country", country.as_deref());
    field(&mut out, "TLD", Some(&domain.tld));

    let registrant = &domain.registrant;
    out.push_str(&format!("\n{}\n", "Registrant:".bold().underline()));
    field(&mut out, "Name", Some(&registrant.name));
    field(&mut out, "Organization", Some(&registrant.organization));
    field(&mut out, "Country", Some(&registrant.country));
    field(&mut out, "Email", Some(&registrant.email));

    if !domain.nameservers.is_empty() {
        out.push_str(&format!("\n{}\n", "Nameservers:".bold().underline()));
        for ns in &domain.nameservers {
            out.push_str(&format!("  {} {}\n", "-".dimmed(), ns));
        }
    }
    out
}
