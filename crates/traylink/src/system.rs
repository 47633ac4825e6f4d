//! The process-wide tray system.
//!
//! One [`Facade`] over a [`TaoRuntime`], created on first [`init`]. Each
//! operation validates its handle on the calling thread, then marshals to
//! the owner thread: blocking where the caller needs the result,
//! fire-and-forget for UI-only updates.

use crate::{
    NotificationRequest, Property, ResourceSpec, TaoRuntime, TrayConfig, TrayError, TrayResult,
    logging, resources::operations,
};

use traylink_core::{Callback, EventKind, Facade, ResourceId, ResourceKind, StopOutcome};

use std::sync::OnceLock;

use tracing::{info, instrument, warn};

static SYSTEM: OnceLock<Facade<TaoRuntime>> = OnceLock::new();

/// Load configuration and logging once, then start the owner thread.
///
/// Idempotent. After [`shutdown`] it starts a fresh owner generation.
#[track_caller]
#[instrument]
pub fn init() -> TrayResult<()> {
    let facade = SYSTEM.get_or_init(|| {
        let loaded = TrayConfig::load();
        let config = loaded.as_ref().cloned().unwrap_or_default();
        // Loading happens before a subscriber exists, so report it now.
        logging::init(&config.logging);
        report_config(&loaded);
        Facade::new(TaoRuntime::new(config.facade.callbacks), config.facade)
    });

    let owner = facade.instance()?;
    info!(generation = owner.generation(), "Tray system initialized");
    Ok(())
}

/// Stop the owner thread. Idempotent; a no-op before [`init`].
#[instrument]
pub fn shutdown() -> StopOutcome {
    match SYSTEM.get() {
        Some(facade) => facade.shutdown(),
        None => StopOutcome::AlreadyStopped,
    }
}

/// Whether the owner thread is running. Never blocks.
pub fn is_ready() -> bool {
    SYSTEM.get().is_some_and(Facade::is_ready)
}

/// The underlying facade, once [`init`] has run.
pub fn facade() -> Option<&'static Facade<TaoRuntime>> {
    SYSTEM.get()
}

/// Create a resource and return its handle.
#[track_caller]
pub fn create_resource(kind: ResourceKind, spec: ResourceSpec) -> TrayResult<ResourceId> {
    let facade = running()?;
    if let Some(parent) = spec.parent {
        check_generation(facade, parent)?;
    }
    facade.run_blocking(move || operations::create(kind, spec))?
}

/// Destroy a resource and everything nested in it. Stale or unknown handles
/// are a no-op. Returns how many resources were released.
#[track_caller]
pub fn destroy_resource(id: ResourceId) -> TrayResult<usize> {
    let Some(facade) = SYSTEM.get() else {
        return Ok(0);
    };
    if check_generation(facade, id).is_err() {
        return Ok(0);
    }
    facade.run_blocking(move || operations::destroy(id))?
}

/// Update one property. Only [`Property::ContextMenu`] waits for the
/// result; failures of the other properties are logged on the owner thread.
#[track_caller]
pub fn set_property(id: ResourceId, property: Property) -> TrayResult<()> {
    let facade = running()?;
    check_generation(facade, id)?;
    if let Property::ContextMenu(Some(menu)) = property {
        check_generation(facade, menu)?;
    }

    if property.is_blocking() {
        return facade.run_blocking(move || operations::set_property(id, property))?;
    }

    let kind = property.kind();
    let queued = facade.run_async(move || {
        if let Err(e) = operations::set_property(id, property) {
            warn!(resource = %id, property = kind.name(), error = %e, "Property update failed");
        }
    });
    if queued {
        Ok(())
    } else {
        Err(TrayError::owner_unavailable("owner stopped before the update was queued"))
    }
}

/// Attach, or with `None` detach, the callback for `event` on `id`.
#[track_caller]
pub fn register_callback(
    id: ResourceId,
    event: EventKind,
    callback: Option<Callback>,
) -> TrayResult<()> {
    let facade = running()?;
    check_generation(facade, id)?;
    facade.run_blocking(move || operations::register_callback(id, event, callback))?
}

/// Show a desktop notification through a notifier or tray handle.
#[track_caller]
pub fn show_notification(id: ResourceId, request: NotificationRequest) -> TrayResult<()> {
    let facade = running()?;
    check_generation(facade, id)?;

    let queued = facade.run_async(move || {
        if let Err(e) = operations::show_notification(id, &request) {
            warn!(resource = %id, error = %e, "Notification failed");
        }
    });
    if queued {
        Ok(())
    } else {
        Err(TrayError::owner_unavailable("owner stopped before the notification was queued"))
    }
}

/// Start the system if needed, then block until its owner thread stops.
#[track_caller]
pub fn run_blocking_loop() -> TrayResult<()> {
    init()?;
    let facade = running()?;
    let owner = facade.ensure_running()?;
    owner.wait_for_exit(None);
    info!(generation = owner.generation(), "Tray loop finished");
    Ok(())
}

/// Process queued work without blocking. Runs it inline on the owner
/// thread; elsewhere only wakes the loop. Returns how many jobs ran here.
pub fn pump_events_nonblocking() -> usize {
    SYSTEM.get().map_or(0, Facade::pump_pending)
}

/// Log the outcome of loading the configuration.
pub(crate) fn report_config(loaded: &TrayResult<TrayConfig>) {
    match loaded {
        Ok(config) => info!(
            config_path = ?TrayConfig::config_path(),
            readiness_timeout_ms = config.facade.readiness_timeout_ms,
            log_filter = %config.logging.filter,
            "Configuration loaded"
        ),
        Err(e) => warn!(error = %e, "Invalid configuration; using defaults"),
    }
}

#[track_caller]
fn running() -> TrayResult<&'static Facade<TaoRuntime>> {
    SYSTEM
        .get()
        .ok_or_else(|| TrayError::owner_unavailable("tray system not initialized"))
}

/// Reject handles minted by an earlier owner generation.
#[track_caller]
fn check_generation(facade: &Facade<TaoRuntime>, id: ResourceId) -> TrayResult<()> {
    if id.generation() == facade.generation() {
        Ok(())
    } else {
        Err(TrayError::invalid_handle(id.to_raw().get()))
    }
}
