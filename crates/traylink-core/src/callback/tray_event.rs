use crate::EventKind;

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOrientation {
    /// Wheel or vertical swipe.
    Vertical,
    /// Horizontal swipe or tilt.
    Horizontal,
}

/// An event raised by a tray resource, with strongly-typed arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayEvent {
    /// Primary click at screen coordinates.
    Activate {
        /// Horizontal position.
        x: i32,
        /// Vertical position.
        y: i32,
    },
    /// Secondary click at screen coordinates.
    SecondaryActivate {
        /// Horizontal position.
        x: i32,
        /// Vertical position.
        y: i32,
    },
    /// Scroll over the icon.
    Scroll {
        /// Scroll amount; sign gives direction.
        delta: i32,
        /// Scroll axis.
        orientation: ScrollOrientation,
    },
    /// A menu action was triggered.
    MenuTriggered,
}

impl TrayEvent {
    /// The registration key for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            TrayEvent::Activate { .. } => EventKind::Activate,
            TrayEvent::SecondaryActivate { .. } => EventKind::SecondaryActivate,
            TrayEvent::Scroll { .. } => EventKind::Scroll,
            TrayEvent::MenuTriggered => EventKind::MenuTriggered,
        }
    }

    /// Flatten to the two integer arguments passed across the C boundary.
    pub fn args(&self) -> (i32, i32) {
        match *self {
            TrayEvent::Activate { x, y } | TrayEvent::SecondaryActivate { x, y } => (x, y),
            TrayEvent::Scroll { delta, orientation } => (
                delta,
                match orientation {
                    ScrollOrientation::Vertical => 0,
                    ScrollOrientation::Horizontal => 1,
                },
            ),
            TrayEvent::MenuTriggered => (0, 0),
        }
    }
}
