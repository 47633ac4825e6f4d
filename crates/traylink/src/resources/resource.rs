use crate::resources::{MenuEntry, MenuResource, NotifierResource, TrayResource};

use traylink_core::ResourceKind;

/// Everything a handle can refer to. Lives only on the owner thread.
pub(crate) enum Resource {
    Tray(TrayResource),
    Menu(MenuResource),
    Entry(MenuEntry),
    Notifier(NotifierResource),
}

impl Resource {
    pub(crate) fn kind(&self) -> ResourceKind {
        match self {
            Resource::Tray(_) => ResourceKind::Tray,
            Resource::Menu(_) => ResourceKind::Menu,
            Resource::Entry(entry) => entry.kind(),
            Resource::Notifier(_) => ResourceKind::Notifier,
        }
    }
}
