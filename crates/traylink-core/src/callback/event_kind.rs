use serde::{Deserialize, Serialize};

/// Discriminant of a [`TrayEvent`](crate::TrayEvent), used as a
/// registration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Primary click on the tray icon.
    Activate,
    /// Secondary click on the tray icon.
    SecondaryActivate,
    /// Scroll over the tray icon.
    Scroll,
    /// A menu action was triggered.
    MenuTriggered,
}

impl EventKind {
    /// Numeric id used at the C boundary.
    pub fn code(self) -> u32 {
        match self {
            EventKind::Activate => 0,
            EventKind::SecondaryActivate => 1,
            EventKind::Scroll => 2,
            EventKind::MenuTriggered => 3,
        }
    }

    /// Inverse of [`EventKind::code`].
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(EventKind::Activate),
            1 => Some(EventKind::SecondaryActivate),
            2 => Some(EventKind::Scroll),
            3 => Some(EventKind::MenuTriggered),
            _ => None,
        }
    }
}
