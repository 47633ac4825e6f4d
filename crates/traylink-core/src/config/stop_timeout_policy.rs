use serde::{Deserialize, Serialize};

/// Behaviour when the owner thread does not exit within the stop timeout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopTimeoutPolicy {
    /// Detach the thread and let the next `instance()` build a fresh owner.
    #[default]
    Abandon,
    /// Cancel the thread (Unix only). Unsafe: leaks everything the thread
    /// held and may leave the foreign runtime corrupted.
    Terminate,
}
