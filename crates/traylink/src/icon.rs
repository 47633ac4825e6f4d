use crate::{TrayError, TrayResult};

use std::{panic::Location, path::Path};

use error_location::ErrorLocation;
use tray_icon::{Icon, menu};

/// Decode an image file into a tray icon.
#[track_caller]
pub(crate) fn load_icon(path: &Path) -> TrayResult<Icon> {
    let (rgba, width, height) = load_rgba(path)?;
    Icon::from_rgba(rgba, width, height).map_err(|e| TrayError::IconLoad {
        reason: format!("Failed to create icon from RGBA: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Decode an image file into an icon for a menu item.
#[track_caller]
pub(crate) fn load_menu_icon(path: &Path) -> TrayResult<menu::Icon> {
    let (rgba, width, height) = load_rgba(path)?;
    menu::Icon::from_rgba(rgba, width, height).map_err(|e| TrayError::IconLoad {
        reason: format!("Failed to create menu icon from RGBA: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })
}

#[track_caller]
fn load_rgba(path: &Path) -> TrayResult<(Vec<u8>, u32, u32)> {
    let img = image::open(path).map_err(|e| TrayError::IconLoad {
        reason: format!("Failed to decode {}: {}", path.display(), e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let rgba = img.into_rgba8();
    let (width, height) = (rgba.width(), rgba.height());
    Ok((rgba.into_raw(), width, height))
}
