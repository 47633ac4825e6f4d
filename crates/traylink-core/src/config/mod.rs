mod callback_policies;
mod facade_config;
mod stop_timeout_policy;

pub use {
    callback_policies::CallbackPolicies, facade_config::FacadeConfig,
    stop_timeout_policy::StopTimeoutPolicy,
};

pub(crate) const DEFAULT_READINESS_TIMEOUT_MS: u64 = 3_000;
pub(crate) const DEFAULT_STOP_TIMEOUT_MS: u64 = 2_000;
pub(crate) const DEFAULT_MARSHAL_TIMEOUT_MS: u64 = 5_000;

pub(crate) fn default_readiness_timeout_ms() -> u64 {
    DEFAULT_READINESS_TIMEOUT_MS
}

pub(crate) fn default_stop_timeout_ms() -> u64 {
    DEFAULT_STOP_TIMEOUT_MS
}

pub(crate) fn default_marshal_timeout_ms() -> u64 {
    DEFAULT_MARSHAL_TIMEOUT_MS
}
