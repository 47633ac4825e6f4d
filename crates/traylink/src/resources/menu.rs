//! Menus and the entries inside them.

use crate::{TrayError, TrayResult, icon::load_menu_icon};

use traylink_core::{ResourceId, ResourceKind};

use std::{panic::Location, path::Path};

use error_location::ErrorLocation;
use tray_icon::menu::{
    CheckMenuItem, IconMenuItem, IsMenuItem, Menu, MenuId, PredefinedMenuItem, Submenu,
};

/// A top-level context menu.
pub(crate) struct MenuResource {
    pub(crate) menu: Menu,
    pub(crate) children: Vec<ResourceId>,
}

impl MenuResource {
    pub(crate) fn new(id: ResourceId) -> Self {
        Self {
            menu: Menu::with_id(menu_id(id)),
            children: Vec::new(),
        }
    }
}

/// The native item behind a menu entry.
pub(crate) enum EntryItem {
    Action(IconMenuItem),
    Check(CheckMenuItem),
    Submenu(Submenu),
    Separator(PredefinedMenuItem),
}

/// An entry attached to a menu or submenu.
pub(crate) struct MenuEntry {
    pub(crate) parent: ResourceId,
    pub(crate) item: EntryItem,
    /// Entries nested under this one; only submenus have any.
    pub(crate) children: Vec<ResourceId>,
}

impl MenuEntry {
    /// Build the native item for `kind`. Does not attach it.
    #[track_caller]
    pub(crate) fn build(
        id: ResourceId,
        kind: ResourceKind,
        parent: ResourceId,
        text: &str,
        enabled: bool,
        checked: bool,
    ) -> TrayResult<Self> {
        let item = match kind {
            ResourceKind::MenuAction => {
                EntryItem::Action(IconMenuItem::with_id(menu_id(id), text, enabled, None, None))
            }
            ResourceKind::CheckAction => EntryItem::Check(CheckMenuItem::with_id(
                menu_id(id),
                text,
                enabled,
                checked,
                None,
            )),
            ResourceKind::Submenu => {
                EntryItem::Submenu(Submenu::with_id(menu_id(id), text, enabled))
            }
            ResourceKind::Separator => EntryItem::Separator(PredefinedMenuItem::separator()),
            other => return Err(TrayError::wrong_kind(other, "menu entry creation")),
        };

        Ok(Self {
            parent,
            item,
            children: Vec::new(),
        })
    }

    pub(crate) fn kind(&self) -> ResourceKind {
        match self.item {
            EntryItem::Action(_) => ResourceKind::MenuAction,
            EntryItem::Check(_) => ResourceKind::CheckAction,
            EntryItem::Submenu(_) => ResourceKind::Submenu,
            EntryItem::Separator(_) => ResourceKind::Separator,
        }
    }

    pub(crate) fn as_menu_item(&self) -> &dyn IsMenuItem {
        match &self.item {
            EntryItem::Action(item) => item,
            EntryItem::Check(item) => item,
            EntryItem::Submenu(item) => item,
            EntryItem::Separator(item) => item,
        }
    }

    #[track_caller]
    pub(crate) fn set_text(&self, text: &str) -> TrayResult<()> {
        match &self.item {
            EntryItem::Action(item) => item.set_text(text),
            EntryItem::Check(item) => item.set_text(text),
            EntryItem::Submenu(item) => item.set_text(text),
            EntryItem::Separator(_) => return Err(TrayError::wrong_kind(self.kind(), "set text")),
        }
        Ok(())
    }

    #[track_caller]
    pub(crate) fn set_enabled(&self, enabled: bool) -> TrayResult<()> {
        match &self.item {
            EntryItem::Action(item) => item.set_enabled(enabled),
            EntryItem::Check(item) => item.set_enabled(enabled),
            EntryItem::Submenu(item) => item.set_enabled(enabled),
            EntryItem::Separator(_) => {
                return Err(TrayError::wrong_kind(self.kind(), "set enabled"));
            }
        }
        Ok(())
    }

    #[track_caller]
    pub(crate) fn set_checked(&self, checked: bool) -> TrayResult<()> {
        match &self.item {
            EntryItem::Check(item) => {
                item.set_checked(checked);
                Ok(())
            }
            _ => Err(TrayError::wrong_kind(self.kind(), "set checked")),
        }
    }

    /// Show the image at `path` beside a menu action, or remove it.
    #[track_caller]
    pub(crate) fn set_icon(&self, path: Option<&Path>) -> TrayResult<()> {
        match &self.item {
            EntryItem::Action(item) => {
                let icon = path.map(load_menu_icon).transpose()?;
                item.set_icon(icon);
                Ok(())
            }
            _ => Err(TrayError::wrong_kind(self.kind(), "set item icon")),
        }
    }

    /// Append `child` if this entry is a submenu.
    #[track_caller]
    pub(crate) fn append(&self, child: &dyn IsMenuItem) -> TrayResult<()> {
        match &self.item {
            EntryItem::Submenu(submenu) => submenu.append(child).map_err(|e| TrayError::Menu {
                reason: format!("Failed to append to submenu: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }),
            _ => Err(TrayError::wrong_kind(self.kind(), "append entry")),
        }
    }

    /// Detach `child` if this entry is a submenu.
    #[track_caller]
    pub(crate) fn remove(&self, child: &dyn IsMenuItem) -> TrayResult<()> {
        match &self.item {
            EntryItem::Submenu(submenu) => submenu.remove(child).map_err(|e| TrayError::Menu {
                reason: format!("Failed to remove from submenu: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }),
            _ => Err(TrayError::wrong_kind(self.kind(), "remove entry")),
        }
    }
}

/// Menu ids carry the raw resource id so menu events map straight back.
pub(crate) fn menu_id(id: ResourceId) -> MenuId {
    MenuId::new(id.to_raw().get().to_string())
}

/// Inverse of [`menu_id`].
pub(crate) fn resource_id_from_menu(id: &MenuId) -> Option<ResourceId> {
    id.0.parse::<u64>().ok().and_then(ResourceId::from_raw)
}
