//! `ip2whois batch` - Resolve a file of queries.

use anyhow::{Context as _, Result};
use colored::Colorize;
use futures_util::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use ip2whois::{classify, CanonicalRecord, Resolution, Resolver};
use serde::Serialize;
use std::io::Read;
use std::path::Path;

use super::lookup::ensure_newline;
use super::Context;
use crate::cli::args::BatchArgs;
use crate::output::{pretty_record, render, OutputFormat, TracedView};

/// One non-comment line of a batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchLine {
    /// 1-based line number
    pub number: usize,
    /// Declared type, passed to the classifier unchanged
    pub kind: String,
    /// Query text
    pub query: String,
}

/// Split a batch file into `<type> <query>` lines, skipping blanks and `#`
/// comments.
pub fn parse_lines(text: &str) -> Vec<BatchLine> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let (kind, query) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            Some(BatchLine {
                number: index + 1,
                kind: kind.to_string(),
                query: query.trim().to_string(),
            })
        })
        .collect()
}

#[derive(Serialize)]
#[serde(untagged)]
enum BatchItem<'a> {
    Record(&'a CanonicalRecord),
    Traced(TracedView<'a>),
    Rejected {
        line: usize,
        query: &'a str,
        error: String,
    },
}

pub async fn execute(ctx: Context, args: BatchArgs) -> Result<()> {
    let text = read_input(&args.file)?;
    let lines = parse_lines(&text);
    let resolver = ctx.resolver()?;

    let progress = progress_bar(&ctx, lines.len() as u64);
    let outcomes: Vec<_> = stream::iter(&lines)
        .map(|line| {
            let resolver = &resolver;
            let progress = &progress;
            async move {
                let outcome = resolve_line(resolver, line).await;
                progress.inc(1);
                outcome
            }
        })
        .buffered(args.concurrency.max(1))
        .collect()
        .await;
    progress.finish_and_clear();

    let rejected = outcomes.iter().filter(|o| o.is_err()).count();

    match ctx.output_format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let items: Vec<_> = lines
                .iter()
                .zip(&outcomes)
                .map(|(line, outcome)| match outcome {
                    Ok(resolution) if ctx.attempts => BatchItem::Traced(TracedView::new(resolution)),
                    Ok(resolution) => BatchItem::Record(&resolution.record),
                    Err(error) => BatchItem::Rejected {
                        line: line.number,
                        query: &line.query,
                        error: error.to_string(),
                    },
                })
                .collect();

            if ctx.output_format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                print!("{}", serde_yaml::to_string(&items)?);
            }
        }
        OutputFormat::Pretty => {
            for (i, (line, outcome)) in lines.iter().zip(&outcomes).enumerate() {
                if i > 0 {
                    println!();
                }
                match outcome {
                    Ok(resolution) => {
                        let text = if ctx.attempts {
                            render(OutputFormat::Pretty, resolution, true)?
                        } else {
                            pretty_record(&resolution.record)
                        };
                        print!("{}", ensure_newline(text));
                    }
                    Err(error) => println!(
                        "{} line {}: {} ({} {})",
                        "Rejected:".red().bold(),
                        line.number,
                        error,
                        line.kind,
                        line.query
                    ),
                }
            }
        }
    }

    if rejected > 0 {
        anyhow::bail!("{rejected} of {} queries rejected", lines.len());
    }
    Ok(())
}

async fn resolve_line(
    resolver: &Resolver,
    line: &BatchLine,
) -> Result<Resolution, ip2whois::ValidationError> {
    let query = classify(&line.query, &line.kind)?;
    Ok(resolver.resolve_query_traced(&query).await)
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn progress_bar(ctx: &Context, len: u64) -> ProgressBar {
    if ctx.output_format != OutputFormat::Pretty || ctx.verbose {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}
