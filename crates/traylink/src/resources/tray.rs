use crate::{TrayError, TrayResult, icon::load_icon};

use traylink_core::ResourceId;

use std::{panic::Location, path::Path};

use error_location::ErrorLocation;
use tracing::{debug, info};
use tray_icon::{TrayIcon, TrayIconBuilder, TrayIconId, menu::Menu};

/// A tray icon and the menu attached to it, if any.
pub(crate) struct TrayResource {
    icon: TrayIcon,
    menu: Option<ResourceId>,
}

impl TrayResource {
    #[track_caller]
    pub(crate) fn build(id: ResourceId, tooltip: Option<&str>) -> TrayResult<Self> {
        let mut builder = TrayIconBuilder::new().with_id(tray_icon_id(id));
        if let Some(tooltip) = tooltip {
            builder = builder.with_tooltip(tooltip);
        }

        let icon = builder.build().map_err(|e| TrayError::TrayIcon {
            reason: format!("Failed to create tray icon: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(resource = %id, "Tray icon created");
        Ok(Self { icon, menu: None })
    }

    pub(crate) fn set_title(&self, title: Option<&str>) {
        self.icon.set_title(title);
    }

    #[track_caller]
    pub(crate) fn set_tooltip(&self, tooltip: Option<&str>) -> TrayResult<()> {
        self.icon.set_tooltip(tooltip).map_err(|e| TrayError::TrayIcon {
            reason: format!("Failed to update tooltip: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    pub(crate) fn set_icon_path(&self, path: &Path) -> TrayResult<()> {
        let icon = load_icon(path)?;
        self.icon.set_icon(Some(icon)).map_err(|e| TrayError::TrayIcon {
            reason: format!("Failed to update icon: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    pub(crate) fn set_visible(&self, visible: bool) -> TrayResult<()> {
        self.icon.set_visible(visible).map_err(|e| TrayError::TrayIcon {
            reason: format!("Failed to change visibility: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Attach `menu` (or detach with `None`).
    pub(crate) fn set_menu(&mut self, menu: Option<(ResourceId, &Menu)>) {
        match menu {
            Some((menu_id, menu)) => {
                self.icon.set_menu(Some(Box::new(menu.clone())));
                self.menu = Some(menu_id);
                debug!(menu = %menu_id, "Context menu attached");
            }
            None => {
                self.icon.set_menu(None);
                self.menu = None;
            }
        }
    }

    pub(crate) fn menu(&self) -> Option<ResourceId> {
        self.menu
    }
}

pub(crate) fn tray_icon_id(id: ResourceId) -> TrayIconId {
    TrayIconId::new(id.to_raw().get().to_string())
}

pub(crate) fn resource_id_from_tray(id: &TrayIconId) -> Option<ResourceId> {
    id.0.parse::<u64>().ok().and_then(ResourceId::from_raw)
}
