//! `ip2whois config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::OutputFormat;

pub fn execute(ctx: Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(&ctx),
        ConfigCommands::Set { key, value } => set_config(&key, &value),
        ConfigCommands::Reset => reset_config(),
        ConfigCommands::Path => show_path(),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = Config::load()?;

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&config)?);
        }
        OutputFormat::Pretty => {
            let resolver = &config.resolver;
            println!("{}", "Current Configuration:".bold());
            println!();

            println!(
                "  {} {}",
                "output_format:".bold(),
                config.output_format.unwrap_or_default()
            );
            println!("  {} {}", "timeout_ms:".bold(), resolver.timeout_ms);
            println!("  {} {}", "user_agent:".bold(), resolver.user_agent);
            println!(
                "  {} {}",
                "whoisxml_api_key:".bold(),
                mask(&resolver.whoisxml_api_key)
            );
            let rps = resolver
                .requests_per_second
                .map_or_else(|| "(unlimited)".dimmed().to_string(), |n| n.to_string());
            println!("  {} {}", "requests_per_second:".bold(), rps);

            println!();
            println!("{}", "Endpoints:".bold().underline());
            println!("  {} {}", "rdap:".bold(), resolver.endpoints.rdap);
            println!("  {} {}", "whoisxml:".bold(), resolver.endpoints.whoisxml);
            println!("  {} {}", "ipwhois:".bold(), resolver.endpoints.ipwhois);
            println!("  {} {}", "ipapi:".bold(), resolver.endpoints.ipapi);
        }
    }

    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    println!("{} {} set to {}.", "Success:".green().bold(), key, value.cyan());
    Ok(())
}

fn reset_config() -> Result<()> {
    Config::default().save()?;
    println!("{} Configuration reset to defaults.", "Success:".green().bold());
    Ok(())
}

fn show_path() -> Result<()> {
    let path = Config::path()?;
    println!("{}", path.display());
    Ok(())
}

/// Show only the ends of a secret
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}
