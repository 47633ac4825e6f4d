use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Failures surfaced by the event-loop facade, with source location tracking.
#[derive(Error, Debug)]
pub enum FacadeError {
    /// The owning thread did not signal readiness within the bound.
    #[error("Owner thread not ready after {timeout_ms}ms {location}")]
    InitializationTimeout {
        /// How long the caller waited.
        timeout_ms: u64,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The foreign runtime could not be constructed on the owning thread.
    #[error("Runtime initialization failed: {reason} {location}")]
    InitializationFailure {
        /// Description of the failure reported by the runtime.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No owner is running, or the work was abandoned during shutdown.
    #[error("No active event loop owner {location}")]
    NoActiveOwner {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A blocking submission was not executed within the bound.
    #[error("Owner thread did not execute work within {timeout_ms}ms {location}")]
    MarshalTimeout {
        /// How long the caller waited.
        timeout_ms: u64,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Marshaled work panicked on the owning thread.
    #[error("Marshaled work panicked: {message} {location}")]
    WorkPanicked {
        /// Panic payload, if it was a string.
        message: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The owning thread could not be spawned.
    #[error("Failed to spawn owner thread: {source} {location}")]
    ThreadSpawnFailed {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl FacadeError {
    #[track_caller]
    pub(crate) fn no_active_owner() -> Self {
        FacadeError::NoActiveOwner {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn initialization_failure(reason: impl Into<String>) -> Self {
        FacadeError::InitializationFailure {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn initialization_timeout(timeout_ms: u64) -> Self {
        FacadeError::InitializationTimeout {
            timeout_ms,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn work_panicked(payload: &(dyn std::any::Any + Send)) -> Self {
        FacadeError::WorkPanicked {
            message: panic_message(payload),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Best-effort extraction of a panic payload's message.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Result type alias using [`FacadeError`].
pub type Result<T> = StdResult<T, FacadeError>;
