//! Configuration loading for traylink.
//!
//! Reads an optional TOML file. The library never writes one: a missing
//! file simply means defaults.

use crate::{
    TrayError, TrayResult,
    config::{CONFIG_PATH_ENV, LoggingConfig},
};

use traylink_core::FacadeConfig;

use std::{
    env, fs,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrayConfig {
    /// Event-loop facade timeouts and callback policies.
    #[serde(default)]
    pub facade: FacadeConfig,
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TrayConfig {
    /// Load from `TRAYLINK_CONFIG`, or the per-user config directory.
    #[track_caller]
    #[instrument]
    pub fn load() -> TrayResult<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No config directory available; using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`, falling back to defaults if it does not exist.
    #[track_caller]
    pub fn load_from(path: &Path) -> TrayResult<Self> {
        if !path.exists() {
            debug!(config_path = ?path, "No config file; using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: TrayConfig = toml::from_str(&contents).map_err(|e| TrayError::Config {
            reason: format!("Failed to parse {}: {}", path.display(), e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(config_path = ?path, "Configuration parsed");
        Ok(config)
    }

    /// Where [`TrayConfig::load`] looks.
    pub(crate) fn config_path() -> Option<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("com", "traylink", "Traylink")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
