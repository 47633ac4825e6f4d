//! Traylink Core Library
//!
//! Single-owner event-loop facade. One dedicated thread constructs and runs a
//! foreign event loop; every other thread reaches it only by marshaling work
//! through an [`Invoker`].
//!
//! # Example
//!
//! ```no_run
//! use traylink_core::{Facade, FacadeConfig, FacadeResult, Runtime};
//!
//! fn title_length<R: Runtime>(facade: &Facade<R>) -> FacadeResult<usize> {
//!     let owner = facade.instance()?;
//!     owner.run_blocking(|| "Traylink".len())
//! }
//! # let _ = FacadeConfig::default();
//! ```

mod callback;
mod config;
mod error;
mod facade;
mod resource;
mod runtime;

pub use {
    callback::{
        Callback, CallbackRegistry, DispatchOutcome, DispatchPolicy, EventKind,
        ScrollOrientation, TrayEvent,
    },
    config::{CallbackPolicies, FacadeConfig, StopTimeoutPolicy},
    error::{FacadeError, Result as FacadeResult},
    facade::{
        EventLoopOwner, Facade, Invoker, OwnerState, Readiness, ReadinessGate, StopOutcome,
    },
    resource::{ResourceId, ResourceKind, ResourceTable},
    runtime::{ForeignLoop, LoopWaker, Runtime, RuntimeError, WakeError},
};

#[cfg(test)]
mod tests;
