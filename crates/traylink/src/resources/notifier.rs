use crate::{TrayError, TrayResult};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use notify_rust::{Notification, Timeout};
use tracing::debug;

/// A desktop notification to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    /// Summary line.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Icon name or path; falls back to the notifier's icon.
    pub icon: Option<String>,
    /// How long to show it; `None` leaves it to the notification server.
    pub timeout: Option<Duration>,
}

/// Defaults applied to notifications sent through one handle.
#[derive(Debug, Clone, Default)]
pub(crate) struct NotifierResource {
    pub(crate) app_name: Option<String>,
    pub(crate) icon: Option<String>,
}

impl NotifierResource {
    #[track_caller]
    pub(crate) fn show(&self, request: &NotificationRequest) -> TrayResult<()> {
        let mut notification = Notification::new();
        notification.summary(&request.title).body(&request.body);

        if let Some(app_name) = &self.app_name {
            notification.appname(app_name);
        }
        if let Some(icon) = request.icon.as_ref().or(self.icon.as_ref()) {
            notification.icon(icon);
        }
        if let Some(timeout) = request.timeout {
            let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
            notification.timeout(Timeout::Milliseconds(millis));
        }

        notification
            .show()
            .map(|_| debug!(title = %request.title, "Notification shown"))
            .map_err(|e| TrayError::Notification {
                reason: format!("Failed to show notification: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
