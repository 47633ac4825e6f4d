mod logging_config;
mod tray_config;

pub use {logging_config::LoggingConfig, tray_config::TrayConfig};

pub(crate) const CONFIG_PATH_ENV: &str = "TRAYLINK_CONFIG";
pub(crate) const DEFAULT_LOG_FILTER: &str = "traylink=info,traylink_core=info";
pub(crate) const DEFAULT_INSTALL_SUBSCRIBER: bool = true;

pub(crate) fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

pub(crate) fn default_install_subscriber() -> bool {
    DEFAULT_INSTALL_SUBSCRIBER
}
