//! ip2whois - IP geolocation and domain registration lookups

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    ip2whois_cli::run().await
}
