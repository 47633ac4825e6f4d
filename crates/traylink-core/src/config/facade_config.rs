use crate::config::{
    CallbackPolicies, StopTimeoutPolicy, default_marshal_timeout_ms,
    default_readiness_timeout_ms, default_stop_timeout_ms,
};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timeouts and policies for the event-loop facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacadeConfig {
    /// How long `instance()` waits for the owner thread to become ready.
    #[serde(default = "default_readiness_timeout_ms")]
    pub readiness_timeout_ms: u64,

    /// How long `shutdown()` waits for the owner thread to exit.
    #[serde(default = "default_stop_timeout_ms")]
    pub stop_timeout_ms: u64,

    /// How long a blocking submission waits for the owner to run it.
    #[serde(default = "default_marshal_timeout_ms")]
    pub marshal_timeout_ms: u64,

    /// What to do when the owner thread outlives `stop_timeout_ms`.
    #[serde(default)]
    pub on_stop_timeout: StopTimeoutPolicy,

    /// Where each kind of tray callback runs.
    #[serde(default)]
    pub callbacks: CallbackPolicies,
}

impl FacadeConfig {
    /// Readiness bound as a [`Duration`].
    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_millis(self.readiness_timeout_ms)
    }

    /// Shutdown join bound as a [`Duration`].
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }

    /// Blocking submission bound as a [`Duration`].
    pub fn marshal_timeout(&self) -> Duration {
        Duration::from_millis(self.marshal_timeout_ms)
    }
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            readiness_timeout_ms: default_readiness_timeout_ms(),
            stop_timeout_ms: default_stop_timeout_ms(),
            marshal_timeout_ms: default_marshal_timeout_ms(),
            on_stop_timeout: StopTimeoutPolicy::default(),
            callbacks: CallbackPolicies::default(),
        }
    }
}
