use crate::callback::{DispatchPolicy, EventKind};

use serde::{Deserialize, Serialize};

/// Dispatch policy for each tray event kind.
///
/// Pointer events default to inline so handlers can re-enter the facade
/// through the same-thread fast path. Menu actions default to a worker
/// thread so application logic never stalls the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackPolicies {
    /// Primary click.
    #[serde(default = "inline")]
    pub activate: DispatchPolicy,
    /// Secondary click.
    #[serde(default = "inline")]
    pub secondary_activate: DispatchPolicy,
    /// Scroll over the icon.
    #[serde(default = "inline")]
    pub scroll: DispatchPolicy,
    /// Menu action triggered.
    #[serde(default = "worker")]
    pub menu_triggered: DispatchPolicy,
}

impl CallbackPolicies {
    /// Policy for the given event kind.
    pub fn for_kind(&self, kind: EventKind) -> DispatchPolicy {
        match kind {
            EventKind::Activate => self.activate,
            EventKind::SecondaryActivate => self.secondary_activate,
            EventKind::Scroll => self.scroll,
            EventKind::MenuTriggered => self.menu_triggered,
        }
    }
}

impl Default for CallbackPolicies {
    fn default() -> Self {
        Self {
            activate: inline(),
            secondary_activate: inline(),
            scroll: inline(),
            menu_triggered: worker(),
        }
    }
}

fn inline() -> DispatchPolicy {
    DispatchPolicy::Inline
}

fn worker() -> DispatchPolicy {
    DispatchPolicy::Worker
}
