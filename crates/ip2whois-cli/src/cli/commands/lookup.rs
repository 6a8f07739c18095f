//! `ip2whois ip|domain|lookup` - Resolve a single query.

use anyhow::Result;
use ip2whois::classify;
use tracing::debug;

use super::Context;
use crate::output::render;

pub async fn execute(ctx: Context, raw: &str, kind: &str) -> Result<()> {
    // Rejected input never reaches a provider
    let query = classify(raw, kind)?;
    let resolver = ctx.resolver()?;
    debug!(%query, kind = %query.kind(), "resolving");

    let spinner = ctx.spinner(format!("Looking up {query}..."));
    let resolution = resolver.resolve_query_traced(&query).await;
    spinner.finish_and_clear();

    print!("{}", ensure_newline(render(ctx.output_format, &resolution, ctx.attempts)?));
    Ok(())
}

pub(crate) fn ensure_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
