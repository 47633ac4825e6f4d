use traylink_core::{FacadeError, ResourceKind};

use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Errors raised by the tray layer.
///
/// All variants include `ErrorLocation` for call-site tracking.
#[derive(Error, Debug)]
pub enum TrayError {
    /// Event-loop facade error from traylink-core.
    #[error("Facade error: {source} {location}")]
    Facade {
        /// The underlying facade error.
        #[source]
        source: FacadeError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The owner thread's resource context is missing or busy.
    #[error("Owner unavailable: {reason} {location}")]
    OwnerUnavailable {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The handle is null, stale, or already destroyed.
    #[error("Invalid handle {handle:#x} {location}")]
    InvalidHandle {
        /// Raw handle value as received.
        handle: u64,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The handle refers to a resource that does not support the operation.
    #[error("{operation} is not supported by {kind:?} {location}")]
    WrongResourceKind {
        /// Kind of the resource the handle refers to.
        kind: ResourceKind,
        /// What was attempted.
        operation: &'static str,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// A required argument was missing or malformed.
    #[error("Invalid argument: {reason} {location}")]
    InvalidArgument {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// An icon file could not be loaded.
    #[error("Failed to load icon: {reason} {location}")]
    IconLoad {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// A menu operation failed.
    #[error("Menu error: {reason} {location}")]
    Menu {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// A tray icon operation failed.
    #[error("Tray icon error: {reason} {location}")]
    TrayIcon {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// A desktop notification could not be shown.
    #[error("Notification error: {reason} {location}")]
    Notification {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Configuration loading error.
    #[error("Configuration error: {reason} {location}")]
    Config {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    Io {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

impl TrayError {
    #[track_caller]
    pub(crate) fn owner_unavailable(reason: impl Into<String>) -> Self {
        TrayError::OwnerUnavailable {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn invalid_handle(handle: u64) -> Self {
        TrayError::InvalidHandle {
            handle,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn wrong_kind(kind: ResourceKind, operation: &'static str) -> Self {
        TrayError::WrongResourceKind {
            kind,
            operation,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        TrayError::InvalidArgument {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

// Manual From<FacadeError> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<FacadeError> for TrayError {
    #[track_caller]
    fn from(source: FacadeError) -> Self {
        TrayError::Facade {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for TrayError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        TrayError::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using `TrayError`.
pub type Result<T> = StdResult<T, TrayError>;
