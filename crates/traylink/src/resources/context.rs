//! Per-owner-thread home of every live resource.
//!
//! Tray and menu objects are `!Send`, so they are stored in a thread-local
//! installed when the runtime initializes and emptied when it tears down.
//! Only code running on the owner thread can reach them.

use crate::{TrayError, TrayResult, resources::Resource};

use traylink_core::{CallbackRegistry, ResourceTable};

use std::{cell::RefCell, sync::Arc};

use tracing::{debug, info};

pub(crate) struct OwnerContext {
    pub(crate) table: ResourceTable<Resource>,
    pub(crate) callbacks: Arc<CallbackRegistry>,
}

thread_local! {
    static CONTEXT: RefCell<Option<OwnerContext>> = const { RefCell::new(None) };
}

/// Make this thread the home of `generation`'s resources.
pub(crate) fn install(generation: u32, callbacks: CallbackRegistry) {
    let context = OwnerContext {
        table: ResourceTable::new(generation),
        callbacks: Arc::new(callbacks),
    };
    let previous = CONTEXT.with(|cell| cell.borrow_mut().replace(context));
    if previous.is_some() {
        debug!(generation, "Replaced a leftover resource context");
    }
}

/// Drop every resource on this thread and revoke all callbacks.
pub(crate) fn teardown() -> usize {
    let Some(mut context) = CONTEXT.with(|cell| cell.borrow_mut().take()) else {
        return 0;
    };

    context.callbacks.clear();
    let generation = context.table.generation();
    let mut drained = context.table.drain();
    // Menu entries first so their parents are intact while they go.
    drained.sort_by_key(|(_, resource)| match resource {
        Resource::Entry(_) => 0,
        Resource::Tray(_) => 1,
        Resource::Menu(_) => 2,
        Resource::Notifier(_) => 3,
    });
    let released = drained.len();
    drop(drained);

    info!(generation, released, "Tray resources released");
    released
}

/// Run `f` against this thread's context.
#[track_caller]
pub(crate) fn with_context<T>(f: impl FnOnce(&mut OwnerContext) -> TrayResult<T>) -> TrayResult<T> {
    CONTEXT.with(|cell| {
        let mut guard = cell
            .try_borrow_mut()
            .map_err(|_| TrayError::owner_unavailable("resource context is busy"))?;
        let context = guard
            .as_mut()
            .ok_or_else(|| TrayError::owner_unavailable("not on a tray owner thread"))?;
        f(context)
    })
}

/// The callback registry of this thread's context, without holding the
/// context borrowed.
pub(crate) fn callbacks() -> Option<Arc<CallbackRegistry>> {
    CONTEXT.with(|cell| {
        cell.try_borrow()
            .ok()
            .and_then(|guard| guard.as_ref().map(|context| Arc::clone(&context.callbacks)))
    })
}
