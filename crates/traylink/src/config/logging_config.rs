use crate::config::{default_install_subscriber, default_log_filter};

use serde::{Deserialize, Serialize};

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Install a `fmt` subscriber on init. Hosts with their own tracing
    /// setup can turn this off.
    #[serde(default = "default_install_subscriber")]
    pub install_subscriber: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            install_subscriber: default_install_subscriber(),
        }
    }
}
