/// The kinds of tray resource a caller can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A tray icon.
    Tray,
    /// A top-level context menu.
    Menu,
    /// A plain menu action.
    MenuAction,
    /// A checkable menu action.
    CheckAction,
    /// A nested menu.
    Submenu,
    /// A menu separator.
    Separator,
    /// A desktop notification source.
    Notifier,
}

impl ResourceKind {
    /// Numeric id used at the C boundary.
    pub fn code(self) -> u32 {
        match self {
            ResourceKind::Tray => 0,
            ResourceKind::Menu => 1,
            ResourceKind::MenuAction => 2,
            ResourceKind::CheckAction => 3,
            ResourceKind::Submenu => 4,
            ResourceKind::Separator => 5,
            ResourceKind::Notifier => 6,
        }
    }

    /// Inverse of [`ResourceKind::code`].
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(ResourceKind::Tray),
            1 => Some(ResourceKind::Menu),
            2 => Some(ResourceKind::MenuAction),
            3 => Some(ResourceKind::CheckAction),
            4 => Some(ResourceKind::Submenu),
            5 => Some(ResourceKind::Separator),
            6 => Some(ResourceKind::Notifier),
            _ => None,
        }
    }

    /// Whether this kind lives inside a menu and needs a parent.
    pub fn is_menu_entry(self) -> bool {
        matches!(
            self,
            ResourceKind::MenuAction
                | ResourceKind::CheckAction
                | ResourceKind::Submenu
                | ResourceKind::Separator
        )
    }
}
