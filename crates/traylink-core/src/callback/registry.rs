//! Callbacks attached to tray resources, dispatched per event kind.
//!
//! Every registration carries a liveness token. Revoking a resource flips
//! its tokens on the owner thread, and worker-dispatched callbacks check the
//! token right before running. A worker that is already past that check
//! still runs once; a destroy only guarantees that no callback starts after
//! the revocation is visible to the worker.

use crate::{
    CallbackPolicies, DispatchPolicy, EventKind, ResourceId, TrayEvent, error::panic_message,
};

use std::{
    collections::HashMap,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
};

use parking_lot::Mutex;
use tracing::{debug, error, trace, warn};

/// A caller-supplied event handler.
pub type Callback = Arc<dyn Fn(&TrayEvent) + Send + Sync>;

struct Registration {
    callback: Callback,
    live: Arc<AtomicBool>,
}

impl Registration {
    fn revoke(&self) {
        self.live.store(false, Ordering::Release);
    }
}

/// What [`CallbackRegistry::dispatch`] did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No callback registered for that resource and event kind.
    NoCallback,
    /// Ran on the calling thread.
    Inline,
    /// Handed to a worker thread.
    Worker,
}

/// Callbacks keyed by resource and event kind.
pub struct CallbackRegistry {
    policies: CallbackPolicies,
    entries: Mutex<HashMap<(ResourceId, EventKind), Registration>>,
}

impl CallbackRegistry {
    /// Create an empty registry with the given dispatch policies.
    pub fn new(policies: CallbackPolicies) -> Self {
        Self {
            policies,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Attach `callback` to `id` for `kind`, replacing and revoking any
    /// previous one.
    pub fn register(&self, id: ResourceId, kind: EventKind, callback: Callback) {
        let registration = Registration {
            callback,
            live: Arc::new(AtomicBool::new(true)),
        };
        if let Some(previous) = self.entries.lock().insert((id, kind), registration) {
            previous.revoke();
        }
        debug!(resource = %id, ?kind, "Callback registered");
    }

    /// Detach the callback for `id` and `kind`. Returns whether one existed.
    pub fn unregister(&self, id: ResourceId, kind: EventKind) -> bool {
        match self.entries.lock().remove(&(id, kind)) {
            Some(registration) => {
                registration.revoke();
                true
            }
            None => false,
        }
    }

    /// Detach every callback of `id`. Returns how many were removed.
    pub fn revoke_resource(&self, id: ResourceId) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|(owner, _), registration| {
            if *owner == id {
                registration.revoke();
                false
            } else {
                true
            }
        });
        before - entries.len()
    }

    /// Detach everything.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.lock();
        let removed = entries.len();
        for registration in entries.values() {
            registration.revoke();
        }
        entries.clear();
        removed
    }

    /// Whether a callback is attached for `id` and `kind`.
    pub fn is_registered(&self, id: ResourceId, kind: EventKind) -> bool {
        self.entries.lock().contains_key(&(id, kind))
    }

    /// Deliver `event` for `id` according to the policy for its kind.
    ///
    /// Call from the owner thread. Callback panics are caught and logged.
    pub fn dispatch(&self, id: ResourceId, event: TrayEvent) -> DispatchOutcome {
        let kind = event.kind();
        let found = self
            .entries
            .lock()
            .get(&(id, kind))
            .map(|r| (Arc::clone(&r.callback), Arc::clone(&r.live)));

        // The lock is released here so a callback may re-register.
        let Some((callback, live)) = found else {
            trace!(resource = %id, ?kind, "No callback for event");
            return DispatchOutcome::NoCallback;
        };

        match self.policies.for_kind(kind) {
            DispatchPolicy::Inline => {
                invoke(id, &callback, &event);
                DispatchOutcome::Inline
            }
            DispatchPolicy::Worker => {
                let worker_callback = Arc::clone(&callback);
                let spawned = thread::Builder::new()
                    .name("traylink-callback".to_string())
                    .spawn(move || {
                        if !live.load(Ordering::Acquire) {
                            debug!(resource = %id, ?kind, "Callback revoked before it ran");
                            return;
                        }
                        invoke(id, &worker_callback, &event);
                    });

                match spawned {
                    Ok(_) => DispatchOutcome::Worker,
                    Err(e) => {
                        warn!(resource = %id, error = %e, "Callback worker spawn failed; running inline");
                        invoke(id, &callback, &event);
                        DispatchOutcome::Inline
                    }
                }
            }
        }
    }
}

fn invoke(id: ResourceId, callback: &Callback, event: &TrayEvent) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback(event))) {
        error!(resource = %id, kind = ?event.kind(), panic = %panic_message(&*payload), "Callback panicked");
    }
}
