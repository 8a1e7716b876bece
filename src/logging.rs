use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the wrapper's own log filter.
///
/// `RUST_LOG` is left alone because it belongs to the node being run.
pub const LOG_ENV: &str = "PARAMI_TRY_RUNTIME_LOG";

const DEFAULT_FILTER: &str = "info";

pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A subscriber may already be installed when embedded in another tool.
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}
