//! The C boundary.
//!
//! Handles are opaque non-null pointers that encode a resource id; they
//! never point at memory. No function here unwinds into the caller: panics
//! are caught, logged and reported as [`TrayStatus::Failed`] (or null).

use crate::{
    NotificationRequest, Property, PropertyKind, ResourceSpec, TrayError, TrayResult, TrayStatus,
    system,
};

use traylink_core::{Callback, EventKind, ResourceId, ResourceKind, TrayEvent};

use std::{
    ffi::{CStr, c_char, c_void},
    panic::{AssertUnwindSafe, catch_unwind},
    path::PathBuf,
    ptr,
    sync::Arc,
    time::Duration,
};

use tracing::{debug, error, warn};

/// Event callback: `(event, a, b, user_data)`. See [`TrayEvent::args`] for
/// what `a` and `b` carry per event.
pub type TrayCallbackFn = extern "C" fn(event: u32, a: i32, b: i32, user_data: *mut c_void);

/// Creation parameters. A null pointer means all defaults.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TrayResourceParams {
    /// Containing menu or submenu, or the tray owning a notifier. May be null.
    pub parent: *mut c_void,
    /// Tooltip, label or app name, depending on the kind. May be null.
    pub text: *const c_char,
    /// Non-zero if a menu entry starts enabled.
    pub enabled: i32,
    /// Non-zero if a checkable entry starts checked.
    pub checked: i32,
}

/// Value for [`traylink_set_property`]. Which field is read depends on the
/// property: text for titles, labels and paths, `flag` for booleans,
/// `handle` for the context menu.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TrayPropertyValue {
    /// UTF-8 text, or null to clear where clearing is allowed.
    pub text: *const c_char,
    /// Boolean as an integer.
    pub flag: i32,
    /// A resource handle, or null.
    pub handle: *mut c_void,
}

/// Opaque caller context handed back to callbacks.
struct UserData(*mut c_void);

// SAFETY: the pointer is never dereferenced here, only handed back to the
// caller's callback. The header documents that it may be used from the
// owner thread or a callback worker thread.
unsafe impl Send for UserData {}
// SAFETY: see above; shared access never touches the pointee.
unsafe impl Sync for UserData {}

impl UserData {
    fn get(&self) -> *mut c_void {
        self.0
    }
}

/// Start the tray system. Idempotent. Returns a [`TrayStatus`] code.
#[unsafe(no_mangle)]
pub extern "C" fn traylink_init_system() -> i32 {
    guard(TrayStatus::Failed.code(), || {
        report("init_system", &system::init())
    })
}

/// Stop the tray system. Idempotent.
#[unsafe(no_mangle)]
pub extern "C" fn traylink_shutdown_system() {
    guard((), || {
        let outcome = system::shutdown();
        debug!(?outcome, "Tray system shutdown");
    });
}

/// Create a resource of `kind` (a [`ResourceKind`] code). Returns null on
/// failure.
///
/// # Safety
///
/// `params` is null or points to a valid [`TrayResourceParams`] whose
/// `text` is null or a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn traylink_create_resource(
    kind: u32,
    params: *const TrayResourceParams,
) -> *mut c_void {
    guard(ptr::null_mut(), || {
        // SAFETY: forwarded caller contract.
        let created = unsafe { create_resource(kind, params) }.and_then(id_to_handle);
        match created {
            Ok(handle) => handle,
            Err(e) => {
                log_failure("create_resource", &e);
                ptr::null_mut()
            }
        }
    })
}

/// Destroy a resource and everything nested in it. Null, stale and
/// already-destroyed handles are ignored.
#[unsafe(no_mangle)]
pub extern "C" fn traylink_destroy_resource(handle: *mut c_void) {
    guard((), || {
        if handle.is_null() {
            return;
        }
        let destroyed = handle_to_id(handle).and_then(system::destroy_resource);
        if let Err(e) = destroyed {
            debug!(error = %e, "Destroy ignored");
        }
    });
}

/// Set a property (a [`PropertyKind`] code). Returns a [`TrayStatus`] code.
///
/// # Safety
///
/// `value.text` is null or a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn traylink_set_property(
    handle: *mut c_void,
    property: u32,
    value: TrayPropertyValue,
) -> i32 {
    guard(TrayStatus::Failed.code(), || {
        // SAFETY: forwarded caller contract.
        let result = unsafe { set_property(handle, property, &value) };
        report("set_property", &result)
    })
}

/// Register `callback` for `event` (an [`EventKind`] code) on `handle`.
/// A null callback unregisters. Returns a [`TrayStatus`] code.
#[unsafe(no_mangle)]
pub extern "C" fn traylink_register_callback(
    handle: *mut c_void,
    event: u32,
    callback: Option<TrayCallbackFn>,
    user_data: *mut c_void,
) -> i32 {
    guard(TrayStatus::Failed.code(), || {
        let result = register_callback(handle, event, callback, UserData(user_data));
        report("register_callback", &result)
    })
}

/// Show a desktop notification through a notifier or tray handle.
/// `timeout_secs <= 0` leaves the duration to the notification server.
/// Returns a [`TrayStatus`] code.
///
/// # Safety
///
/// `title` is a NUL-terminated string; `body` and `icon` are null or
/// NUL-terminated strings.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn traylink_show_notification(
    handle: *mut c_void,
    title: *const c_char,
    body: *const c_char,
    icon: *const c_char,
    timeout_secs: i32,
) -> i32 {
    guard(TrayStatus::Failed.code(), || {
        // SAFETY: forwarded caller contract.
        let result = unsafe { show_notification(handle, title, body, icon, timeout_secs) };
        report("show_notification", &result)
    })
}

/// Start the system if needed and block until it stops. Returns a
/// [`TrayStatus`] code.
#[unsafe(no_mangle)]
pub extern "C" fn traylink_run_blocking_loop() -> i32 {
    guard(TrayStatus::Failed.code(), || {
        report("run_blocking_loop", &system::run_blocking_loop())
    })
}

/// Process queued work without blocking.
#[unsafe(no_mangle)]
pub extern "C" fn traylink_pump_events_nonblocking() {
    guard((), || {
        system::pump_events_nonblocking();
    });
}

/// `1` if the tray system is running, `0` otherwise. Never blocks.
#[unsafe(no_mangle)]
pub extern "C" fn traylink_is_ready() -> i32 {
    guard(0, || i32::from(system::is_ready()))
}

/// # Safety
///
/// As [`traylink_create_resource`].
unsafe fn create_resource(kind: u32, params: *const TrayResourceParams) -> TrayResult<ResourceId> {
    let kind = ResourceKind::from_code(kind)
        .ok_or_else(|| TrayError::invalid_argument(format!("unknown resource kind {kind}")))?;

    let spec = if params.is_null() {
        ResourceSpec::default()
    } else {
        // SAFETY: non-null and valid per caller contract.
        let params = unsafe { &*params };
        ResourceSpec {
            parent: optional_handle(params.parent)?,
            // SAFETY: caller contract on `text`.
            text: unsafe { optional_string(params.text) }?,
            enabled: params.enabled != 0,
            checked: params.checked != 0,
        }
    };

    system::create_resource(kind, spec)
}

/// # Safety
///
/// As [`traylink_set_property`].
unsafe fn set_property(
    handle: *mut c_void,
    property: u32,
    value: &TrayPropertyValue,
) -> TrayResult<()> {
    let id = handle_to_id(handle)?;
    let kind = PropertyKind::from_code(property)
        .ok_or_else(|| TrayError::invalid_argument(format!("unknown property {property}")))?;

    // SAFETY: caller contract on `value.text`, for every arm below.
    let property = match kind {
        PropertyKind::Title => Property::Title(unsafe { optional_string(value.text) }?),
        PropertyKind::Tooltip => Property::Tooltip(unsafe { optional_string(value.text) }?),
        PropertyKind::IconPath => Property::IconPath(PathBuf::from(unsafe {
            required_string(value.text, "icon path")
        }?)),
        PropertyKind::Visible => Property::Visible(value.flag != 0),
        PropertyKind::ItemText => {
            Property::ItemText(unsafe { required_string(value.text, "item text") }?)
        }
        PropertyKind::ItemEnabled => Property::ItemEnabled(value.flag != 0),
        PropertyKind::ItemChecked => Property::ItemChecked(value.flag != 0),
        PropertyKind::ContextMenu => Property::ContextMenu(optional_handle(value.handle)?),
        PropertyKind::ItemIcon => {
            Property::ItemIcon(unsafe { optional_string(value.text) }?.map(PathBuf::from))
        }
    };

    system::set_property(id, property)
}

fn register_callback(
    handle: *mut c_void,
    event: u32,
    callback: Option<TrayCallbackFn>,
    user_data: UserData,
) -> TrayResult<()> {
    let id = handle_to_id(handle)?;
    let kind = EventKind::from_code(event)
        .ok_or_else(|| TrayError::invalid_argument(format!("unknown event {event}")))?;

    let callback = callback.map(|callback| -> Callback {
        Arc::new(move |event: &TrayEvent| {
            let (a, b) = event.args();
            callback(event.kind().code(), a, b, user_data.get());
        })
    });

    system::register_callback(id, kind, callback)
}

/// # Safety
///
/// As [`traylink_show_notification`].
unsafe fn show_notification(
    handle: *mut c_void,
    title: *const c_char,
    body: *const c_char,
    icon: *const c_char,
    timeout_secs: i32,
) -> TrayResult<()> {
    let id = handle_to_id(handle)?;
    // SAFETY: caller contract on the three strings.
    let request = unsafe {
        NotificationRequest {
            title: required_string(title, "title")?,
            body: optional_string(body)?.unwrap_or_default(),
            icon: optional_string(icon)?,
            timeout: u64::try_from(timeout_secs)
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    };

    system::show_notification(id, request)
}

fn handle_to_id(handle: *mut c_void) -> TrayResult<ResourceId> {
    let raw = handle.addr() as u64;
    ResourceId::from_raw(raw).ok_or_else(|| TrayError::invalid_handle(raw))
}

fn optional_handle(handle: *mut c_void) -> TrayResult<Option<ResourceId>> {
    if handle.is_null() {
        Ok(None)
    } else {
        handle_to_id(handle).map(Some)
    }
}

fn id_to_handle(id: ResourceId) -> TrayResult<*mut c_void> {
    usize::try_from(id.to_raw().get())
        .map(ptr::without_provenance_mut)
        .map_err(|_| TrayError::invalid_argument("resource id does not fit in a pointer"))
}

/// # Safety
///
/// `text` is null or a NUL-terminated string valid for reads.
unsafe fn optional_string(text: *const c_char) -> TrayResult<Option<String>> {
    if text.is_null() {
        return Ok(None);
    }
    // SAFETY: non-null and NUL-terminated per contract.
    let text = unsafe { CStr::from_ptr(text) };
    text.to_str()
        .map(|text| Some(text.to_owned()))
        .map_err(|e| TrayError::invalid_argument(format!("string is not UTF-8: {e}")))
}

/// # Safety
///
/// As [`optional_string`].
unsafe fn required_string(text: *const c_char, what: &str) -> TrayResult<String> {
    // SAFETY: forwarded contract.
    unsafe { optional_string(text) }?
        .ok_or_else(|| TrayError::invalid_argument(format!("{what} must not be null")))
}

fn report<T>(operation: &'static str, result: &TrayResult<T>) -> i32 {
    if let Err(e) = result {
        log_failure(operation, e);
    }
    TrayStatus::from(result).code()
}

fn log_failure(operation: &'static str, error: &TrayError) {
    match TrayStatus::from(error) {
        TrayStatus::InvalidHandle | TrayStatus::InvalidArgument => {
            debug!(operation, error = %error, "Tray call rejected");
        }
        _ => warn!(operation, error = %error, "Tray call failed"),
    }
}

fn guard<T>(fallback: T, f: impl FnOnce() -> T) -> T {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        error!("Panic stopped at the C boundary");
        fallback
    })
}
