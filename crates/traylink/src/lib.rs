//! Traylink
//!
//! System tray icons, menus and notifications behind a C ABI. Every native
//! object lives on one owner thread; callers on any thread hold opaque
//! handles and marshal requests through the [`traylink_core`] facade.
//!
//! Rust callers can use the [`system`] functions directly; C callers use
//! [`ffi`] and `include/traylink.h`.

mod config;
mod error;
pub mod ffi;
mod icon;
mod logging;
mod resources;
mod status;
pub mod system;
mod tao_runtime;

pub use {
    config::{LoggingConfig, TrayConfig},
    error::{Result as TrayResult, TrayError},
    logging::init as init_logging,
    resources::{NotificationRequest, Property, PropertyKind, ResourceSpec},
    status::TrayStatus,
    tao_runtime::{LoopSignal, TaoRuntime},
};

pub use traylink_core::{
    Callback, EventKind, FacadeConfig, ResourceId, ResourceKind, ScrollOrientation, StopOutcome,
    TrayEvent,
};
