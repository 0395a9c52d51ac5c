use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

fn directive(verbose: bool) -> &'static str {
    if verbose { "leavecal=debug" } else { "leavecal=warn" }
}

/// Installs the stderr subscriber. `RUST_LOG` wins unless `verbose` is set.
pub fn init(verbose: bool) {
    TRACING_INIT.call_once(|| {
        let filter = if verbose {
            EnvFilter::new(directive(true))
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive(false)))
        };
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
