use crate::TrayError;

use traylink_core::FacadeError;

/// Status codes returned across the C boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum TrayStatus {
    /// Success.
    Ok = 0,
    /// The owner thread did not become ready in time.
    InitializationTimeout = -1,
    /// The tray runtime could not be started.
    InitializationFailure = -2,
    /// The system is not running, or the work was abandoned at shutdown.
    NoActiveOwner = -3,
    /// The owner thread did not run the request in time.
    MarshalTimeout = -4,
    /// Null, stale or destroyed handle.
    InvalidHandle = -5,
    /// Missing or malformed argument, or an operation the resource does not
    /// support.
    InvalidArgument = -6,
    /// Any other failure.
    Failed = -7,
}

impl TrayStatus {
    /// The raw code handed to C.
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<&FacadeError> for TrayStatus {
    fn from(error: &FacadeError) -> Self {
        match error {
            FacadeError::InitializationTimeout { .. } => TrayStatus::InitializationTimeout,
            FacadeError::InitializationFailure { .. } | FacadeError::ThreadSpawnFailed { .. } => {
                TrayStatus::InitializationFailure
            }
            FacadeError::NoActiveOwner { .. } => TrayStatus::NoActiveOwner,
            FacadeError::MarshalTimeout { .. } => TrayStatus::MarshalTimeout,
            FacadeError::WorkPanicked { .. } => TrayStatus::Failed,
        }
    }
}

impl From<&TrayError> for TrayStatus {
    fn from(error: &TrayError) -> Self {
        match error {
            TrayError::Facade { source, .. } => TrayStatus::from(source),
            TrayError::OwnerUnavailable { .. } => TrayStatus::NoActiveOwner,
            TrayError::InvalidHandle { .. } => TrayStatus::InvalidHandle,
            TrayError::WrongResourceKind { .. } | TrayError::InvalidArgument { .. } => {
                TrayStatus::InvalidArgument
            }
            TrayError::IconLoad { .. }
            | TrayError::Menu { .. }
            | TrayError::TrayIcon { .. }
            | TrayError::Notification { .. }
            | TrayError::Config { .. }
            | TrayError::Io { .. } => TrayStatus::Failed,
        }
    }
}

impl<T> From<&crate::TrayResult<T>> for TrayStatus {
    fn from(result: &crate::TrayResult<T>) -> Self {
        match result {
            Ok(_) => TrayStatus::Ok,
            Err(e) => TrayStatus::from(e),
        }
    }
}
