//! Resource operations. Every function here runs on the owner thread.

use crate::{
    Property, ResourceSpec, TrayError, TrayResult,
    resources::{
        MenuEntry, MenuResource, NotificationRequest, NotifierResource, Resource, TrayResource,
        context::{self, OwnerContext},
        resource_id_from_menu, resource_id_from_tray,
    },
};

use traylink_core::{Callback, EventKind, ResourceId, ResourceKind, TrayEvent};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tracing::{debug, instrument, trace};
use tray_icon::{
    MouseButton, MouseButtonState, TrayIconEvent,
    menu::{Menu, MenuEvent},
};

#[track_caller]
#[instrument(skip(spec))]
pub(crate) fn create(kind: ResourceKind, spec: ResourceSpec) -> TrayResult<ResourceId> {
    let id = context::with_context(|ctx| {
        if kind.is_menu_entry() {
            return create_entry(ctx, kind, &spec);
        }

        let id = allocate(ctx)?;
        let resource = match kind {
            ResourceKind::Tray => Resource::Tray(TrayResource::build(id, spec.text.as_deref())?),
            ResourceKind::Menu => {
                if spec.parent.is_some() {
                    return Err(TrayError::invalid_argument("menus have no parent"));
                }
                Resource::Menu(MenuResource::new(id))
            }
            ResourceKind::Notifier => {
                if let Some(parent) = spec.parent {
                    expect_kind(ctx, parent, ResourceKind::Tray, "own a notifier")?;
                }
                Resource::Notifier(NotifierResource {
                    app_name: spec.text.clone(),
                    icon: None,
                })
            }
            other => return Err(TrayError::wrong_kind(other, "creation")),
        };
        place(ctx, id, resource)?;
        Ok(id)
    })?;

    debug!(resource = %id, ?kind, "Resource created");
    Ok(id)
}

#[track_caller]
fn create_entry(
    ctx: &mut OwnerContext,
    kind: ResourceKind,
    spec: &ResourceSpec,
) -> TrayResult<ResourceId> {
    let parent = spec
        .parent
        .ok_or_else(|| TrayError::invalid_argument("menu entries need a parent menu"))?;
    let text = match (&spec.text, kind) {
        (_, ResourceKind::Separator) => "",
        (Some(text), _) => text.as_str(),
        (None, _) => return Err(TrayError::invalid_argument("menu entries need a label")),
    };

    let id = allocate(ctx)?;
    let entry = MenuEntry::build(id, kind, parent, text, spec.enabled, spec.checked)?;

    match ctx.table.get_mut(parent) {
        Some(Resource::Menu(menu)) => {
            menu.menu
                .append(entry.as_menu_item())
                .map_err(|e| TrayError::Menu {
                    reason: format!("Failed to append to menu: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
            menu.children.push(id);
        }
        Some(Resource::Entry(submenu)) => {
            submenu.append(entry.as_menu_item())?;
            submenu.children.push(id);
        }
        Some(other) => return Err(TrayError::wrong_kind(other.kind(), "contain menu entries")),
        None => return Err(TrayError::invalid_handle(parent.to_raw().get())),
    }

    place(ctx, id, Resource::Entry(entry))?;
    Ok(id)
}

/// Destroy `id` and everything nested under it. Unknown ids are a no-op.
#[instrument]
pub(crate) fn destroy(id: ResourceId) -> TrayResult<usize> {
    let removed = context::with_context(|ctx| {
        if !ctx.table.contains(id) {
            debug!(resource = %id, "Destroy of unknown resource ignored");
            return Ok(Vec::new());
        }

        detach_from_parent(ctx, id);
        let mut removed = Vec::new();
        remove_subtree(ctx, id, &mut removed);

        for (removed_id, resource) in &removed {
            ctx.callbacks.revoke_resource(*removed_id);
            if let Resource::Menu(_) = resource {
                detach_menu_from_trays(ctx, *removed_id);
            }
        }
        Ok(removed)
    })?;

    let count = removed.len();
    // Dropped outside the context borrow.
    drop(removed);
    if count > 0 {
        debug!(resource = %id, count, "Resource destroyed");
    }
    Ok(count)
}

fn detach_from_parent(ctx: &mut OwnerContext, id: ResourceId) {
    let Some(Resource::Entry(entry)) = ctx.table.get(id) else {
        return;
    };
    let parent = entry.parent;

    let detached = match ctx.table.get(parent) {
        Some(Resource::Menu(menu)) => menu
            .menu
            .remove(entry.as_menu_item())
            .map_err(|e| e.to_string()),
        Some(Resource::Entry(submenu)) => submenu
            .remove(entry.as_menu_item())
            .map_err(|e| e.to_string()),
        _ => Ok(()),
    };
    if let Err(reason) = detached {
        debug!(resource = %id, parent = %parent, reason = %reason, "Entry already detached");
    }

    match ctx.table.get_mut(parent) {
        Some(Resource::Menu(menu)) => menu.children.retain(|child| *child != id),
        Some(Resource::Entry(submenu)) => submenu.children.retain(|child| *child != id),
        _ => {}
    }
}

fn remove_subtree(ctx: &mut OwnerContext, id: ResourceId, out: &mut Vec<(ResourceId, Resource)>) {
    let Some(resource) = ctx.table.remove(id) else {
        return;
    };
    let children = match &resource {
        Resource::Menu(menu) => menu.children.clone(),
        Resource::Entry(entry) => entry.children.clone(),
        Resource::Tray(_) | Resource::Notifier(_) => Vec::new(),
    };
    for child in children {
        remove_subtree(ctx, child, out);
    }
    out.push((id, resource));
}

fn detach_menu_from_trays(ctx: &mut OwnerContext, menu: ResourceId) {
    for id in ctx.table.ids() {
        if let Some(Resource::Tray(tray)) = ctx.table.get_mut(id)
            && tray.menu() == Some(menu)
        {
            tray.set_menu(None);
        }
    }
}

#[track_caller]
pub(crate) fn set_property(id: ResourceId, property: Property) -> TrayResult<()> {
    context::with_context(|ctx| {
        if let Property::ContextMenu(menu) = property {
            return attach_menu(ctx, id, menu);
        }

        let name = property.kind().name();
        match ctx.table.get_mut(id) {
            Some(Resource::Tray(tray)) => match property {
                Property::Title(title) => {
                    tray.set_title(title.as_deref());
                    Ok(())
                }
                Property::Tooltip(tooltip) => tray.set_tooltip(tooltip.as_deref()),
                Property::IconPath(path) => tray.set_icon_path(&path),
                Property::Visible(visible) => tray.set_visible(visible),
                _ => Err(TrayError::wrong_kind(ResourceKind::Tray, name)),
            },
            Some(Resource::Entry(entry)) => match property {
                Property::ItemText(text) => entry.set_text(&text),
                Property::ItemEnabled(enabled) => entry.set_enabled(enabled),
                Property::ItemChecked(checked) => entry.set_checked(checked),
                Property::ItemIcon(path) => entry.set_icon(path.as_deref()),
                _ => Err(TrayError::wrong_kind(entry.kind(), name)),
            },
            Some(Resource::Notifier(notifier)) => match property {
                Property::Title(app_name) => {
                    notifier.app_name = app_name;
                    Ok(())
                }
                Property::IconPath(path) => {
                    notifier.icon = Some(path.to_string_lossy().into_owned());
                    Ok(())
                }
                _ => Err(TrayError::wrong_kind(ResourceKind::Notifier, name)),
            },
            Some(Resource::Menu(_)) => Err(TrayError::wrong_kind(ResourceKind::Menu, name)),
            None => Err(TrayError::invalid_handle(id.to_raw().get())),
        }
    })
}

#[track_caller]
fn attach_menu(ctx: &mut OwnerContext, tray: ResourceId, menu: Option<ResourceId>) -> TrayResult<()> {
    let native: Option<Menu> = match menu {
        Some(menu_id) => match ctx.table.get(menu_id) {
            Some(Resource::Menu(menu)) => Some(menu.menu.clone()),
            Some(other) => return Err(TrayError::wrong_kind(other.kind(), "use as context menu")),
            None => return Err(TrayError::invalid_handle(menu_id.to_raw().get())),
        },
        None => None,
    };

    match ctx.table.get_mut(tray) {
        Some(Resource::Tray(icon)) => {
            icon.set_menu(menu.zip(native.as_ref()));
            Ok(())
        }
        Some(other) => Err(TrayError::wrong_kind(other.kind(), "attach a context menu")),
        None => Err(TrayError::invalid_handle(tray.to_raw().get())),
    }
}

/// Attach or, with `None`, detach the callback for `kind` on `id`.
#[track_caller]
pub(crate) fn register_callback(
    id: ResourceId,
    kind: EventKind,
    callback: Option<Callback>,
) -> TrayResult<()> {
    let callbacks = context::with_context(|ctx| {
        let resource_kind = ctx
            .table
            .get(id)
            .map(Resource::kind)
            .ok_or_else(|| TrayError::invalid_handle(id.to_raw().get()))?;

        let supported = match kind {
            EventKind::Activate | EventKind::SecondaryActivate | EventKind::Scroll => {
                resource_kind == ResourceKind::Tray
            }
            EventKind::MenuTriggered => matches!(
                resource_kind,
                ResourceKind::MenuAction | ResourceKind::CheckAction
            ),
        };
        if !supported {
            return Err(TrayError::wrong_kind(resource_kind, "callback registration"));
        }
        Ok(Arc::clone(&ctx.callbacks))
    })?;

    match callback {
        Some(callback) => callbacks.register(id, kind, callback),
        None => {
            callbacks.unregister(id, kind);
        }
    }
    Ok(())
}

/// Show a notification through a notifier, or a tray with default settings.
#[track_caller]
pub(crate) fn show_notification(id: ResourceId, request: &NotificationRequest) -> TrayResult<()> {
    let notifier = context::with_context(|ctx| match ctx.table.get(id) {
        Some(Resource::Notifier(notifier)) => Ok(notifier.clone()),
        Some(Resource::Tray(_)) => Ok(NotifierResource::default()),
        Some(other) => Err(TrayError::wrong_kind(other.kind(), "show a notification")),
        None => Err(TrayError::invalid_handle(id.to_raw().get())),
    })?;
    notifier.show(request)
}

/// Route a tray icon event to its callback.
pub(crate) fn dispatch_tray_event(event: TrayIconEvent) {
    let Some(id) = resource_id_from_tray(event.id()) else {
        trace!(tray = ?event.id(), "Event for a foreign tray icon");
        return;
    };

    let tray_event = match event {
        TrayIconEvent::Click {
            position,
            button: MouseButton::Left,
            button_state: MouseButtonState::Up,
            ..
        } => TrayEvent::Activate {
            x: position.x as i32,
            y: position.y as i32,
        },
        TrayIconEvent::Click {
            position,
            button: MouseButton::Middle,
            button_state: MouseButtonState::Up,
            ..
        } => TrayEvent::SecondaryActivate {
            x: position.x as i32,
            y: position.y as i32,
        },
        _ => return,
    };
    dispatch(id, tray_event);
}

/// Route a menu event to its callback.
pub(crate) fn dispatch_menu_event(event: MenuEvent) {
    match resource_id_from_menu(&event.id) {
        Some(id) => dispatch(id, TrayEvent::MenuTriggered),
        None => trace!(menu = ?event.id, "Event for a foreign menu item"),
    }
}

fn dispatch(id: ResourceId, event: TrayEvent) {
    // The registry is cloned out so callbacks can re-enter the context.
    match context::callbacks() {
        Some(callbacks) => {
            callbacks.dispatch(id, event);
        }
        None => trace!(resource = %id, "Event after teardown dropped"),
    }
}

#[track_caller]
fn allocate(ctx: &mut OwnerContext) -> TrayResult<ResourceId> {
    ctx.table
        .allocate()
        .ok_or_else(|| TrayError::invalid_argument("no free resource ids left"))
}

#[track_caller]
fn place(ctx: &mut OwnerContext, id: ResourceId, resource: Resource) -> TrayResult<()> {
    ctx.table
        .place(id, resource)
        .map_err(|_| TrayError::invalid_argument("resource id already in use"))
}

#[track_caller]
fn expect_kind(
    ctx: &OwnerContext,
    id: ResourceId,
    expected: ResourceKind,
    operation: &'static str,
) -> TrayResult<()> {
    match ctx.table.get(id).map(Resource::kind) {
        Some(kind) if kind == expected => Ok(()),
        Some(kind) => Err(TrayError::wrong_kind(kind, operation)),
        None => Err(TrayError::invalid_handle(id.to_raw().get())),
    }
}
