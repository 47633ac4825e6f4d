use traylink_core::ResourceId;

use std::path::PathBuf;

/// A mutable attribute of a tray resource, with its new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    /// Tray title text, or notifier app name. `None` clears it.
    Title(Option<String>),
    /// Tray hover text. `None` clears it.
    Tooltip(Option<String>),
    /// Image file for the tray icon, or default icon of a notifier.
    IconPath(PathBuf),
    /// Show or hide the tray icon.
    Visible(bool),
    /// Label of a menu entry.
    ItemText(String),
    /// Whether a menu entry can be activated.
    ItemEnabled(bool),
    /// Check state of a checkable entry.
    ItemChecked(bool),
    /// Menu shown by the tray icon. `None` detaches it.
    ContextMenu(Option<ResourceId>),
    /// Image file shown beside a menu action. `None` removes it.
    ItemIcon(Option<PathBuf>),
}

/// Numeric property ids used at the C boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// See [`Property::Title`].
    Title,
    /// See [`Property::Tooltip`].
    Tooltip,
    /// See [`Property::IconPath`].
    IconPath,
    /// See [`Property::Visible`].
    Visible,
    /// See [`Property::ItemText`].
    ItemText,
    /// See [`Property::ItemEnabled`].
    ItemEnabled,
    /// See [`Property::ItemChecked`].
    ItemChecked,
    /// See [`Property::ContextMenu`].
    ContextMenu,
    /// See [`Property::ItemIcon`].
    ItemIcon,
}

impl PropertyKind {
    /// Numeric id used at the C boundary.
    pub fn code(self) -> u32 {
        match self {
            PropertyKind::Title => 0,
            PropertyKind::Tooltip => 1,
            PropertyKind::IconPath => 2,
            PropertyKind::Visible => 3,
            PropertyKind::ItemText => 4,
            PropertyKind::ItemEnabled => 5,
            PropertyKind::ItemChecked => 6,
            PropertyKind::ContextMenu => 7,
            PropertyKind::ItemIcon => 8,
        }
    }

    /// Short name used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            PropertyKind::Title => "title",
            PropertyKind::Tooltip => "tooltip",
            PropertyKind::IconPath => "icon path",
            PropertyKind::Visible => "visibility",
            PropertyKind::ItemText => "item text",
            PropertyKind::ItemEnabled => "item enabled",
            PropertyKind::ItemChecked => "item checked",
            PropertyKind::ContextMenu => "context menu",
            PropertyKind::ItemIcon => "item icon",
        }
    }

    /// Inverse of [`PropertyKind::code`].
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(PropertyKind::Title),
            1 => Some(PropertyKind::Tooltip),
            2 => Some(PropertyKind::IconPath),
            3 => Some(PropertyKind::Visible),
            4 => Some(PropertyKind::ItemText),
            5 => Some(PropertyKind::ItemEnabled),
            6 => Some(PropertyKind::ItemChecked),
            7 => Some(PropertyKind::ContextMenu),
            8 => Some(PropertyKind::ItemIcon),
            _ => None,
        }
    }
}

impl Property {
    /// Which property this is.
    pub fn kind(&self) -> PropertyKind {
        match self {
            Property::Title(_) => PropertyKind::Title,
            Property::Tooltip(_) => PropertyKind::Tooltip,
            Property::IconPath(_) => PropertyKind::IconPath,
            Property::Visible(_) => PropertyKind::Visible,
            Property::ItemText(_) => PropertyKind::ItemText,
            Property::ItemEnabled(_) => PropertyKind::ItemEnabled,
            Property::ItemChecked(_) => PropertyKind::ItemChecked,
            Property::ContextMenu(_) => PropertyKind::ContextMenu,
            Property::ItemIcon(_) => PropertyKind::ItemIcon,
        }
    }

    /// Whether setting it waits for the owner thread. Only attaching a
    /// menu does; everything else is fire-and-forget.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Property::ContextMenu(_))
    }
}
