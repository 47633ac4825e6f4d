mod dispatch_policy;
mod event_kind;
mod registry;
mod tray_event;

pub use {
    dispatch_policy::DispatchPolicy,
    event_kind::EventKind,
    registry::{Callback, CallbackRegistry, DispatchOutcome},
    tray_event::{ScrollOrientation, TrayEvent},
};
