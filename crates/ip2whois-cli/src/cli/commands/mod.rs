//! Command implementations.

pub mod batch;
pub mod config;
pub mod lookup;

use ip2whois::{ClientConfig, Resolver};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Provider client settings after flag overrides
    pub client_config: ClientConfig,

    /// Output format
    pub output_format: OutputFormat,

    /// Print the attempt log
    pub attempts: bool,

    /// Verbose output
    pub verbose: bool,

    /// Disable colors
    pub no_color: bool,
}

impl Context {
    /// Create a resolver over the default providers.
    pub fn resolver(&self) -> anyhow::Result<Resolver> {
        Ok(Resolver::from_config(self.client_config.clone())?)
    }

    /// Spinner on stderr; hidden when stderr is not a terminal or output is
    /// machine-readable.
    pub fn spinner(&self, message: String) -> ProgressBar {
        if self.output_format != OutputFormat::Pretty || self.verbose {
            return ProgressBar::hidden();
        }

        let template = if self.no_color {
            "{spinner} {msg}"
        } else {
            "{spinner:.cyan} {msg}"
        };
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template(template)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}
