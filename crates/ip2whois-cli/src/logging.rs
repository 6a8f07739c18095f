use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` takes precedence; otherwise only warnings are shown, or debug
/// events for the ip2whois crates when `verbose` is set.
///
/// E.g. to watch every provider request:
///   RUST_LOG=ip2whois_client=DEBUG
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "warn,ip2whois_client=debug,ip2whois_resolver=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .ok();
}
