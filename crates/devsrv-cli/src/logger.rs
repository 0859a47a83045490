//! Logging setup built on the `tracing` ecosystem.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Call once at startup, before any logging occurs. The level is determined
/// in this order: `--verbose` (debug), `--quiet` (errors only), `RUST_LOG`,
/// then the info-level default.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("devsrv=debug,devsrv_cli=debug")
    } else if quiet {
        EnvFilter::new("devsrv=error,devsrv_cli=error")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("devsrv=info,devsrv_cli=info"))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    // tracing is global and can only be initialized once per process, so
    // these only exercise filter construction.

    #[test]
    fn test_filter_construction() {
        let _ = EnvFilter::new("devsrv=debug,devsrv_cli=debug");
        let _ = EnvFilter::new("devsrv=error,devsrv_cli=error");
    }
}
