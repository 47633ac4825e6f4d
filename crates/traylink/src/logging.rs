use crate::LoggingConfig;

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Install the `fmt` subscriber. `RUST_LOG` takes precedence over the
/// configured filter. A subscriber the host installed first is left alone.
pub fn init(config: &LoggingConfig) {
    if !config.install_subscriber {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .try_init()
        .is_err()
    {
        debug!("Tracing subscriber already installed");
    }
}
