use serde::{Deserialize, Serialize};

/// Where a callback runs when its event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// On the owner thread, inside the event loop. Long handlers stall the
    /// loop; re-entering the facade is safe through the same-thread path.
    Inline,
    /// On a short-lived worker thread. Handlers that touch resources must
    /// marshal back through the facade.
    Worker,
}
