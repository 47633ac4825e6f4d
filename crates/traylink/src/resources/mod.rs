pub(crate) mod context;
mod menu;
mod notifier;
pub(crate) mod operations;
mod property;
mod resource;
mod resource_spec;
mod tray;

pub(crate) use {
    context::{install, teardown},
    menu::{MenuEntry, MenuResource, resource_id_from_menu},
    notifier::NotifierResource,
    resource::Resource,
    tray::{TrayResource, resource_id_from_tray},
};

pub use {
    notifier::NotificationRequest,
    property::{Property, PropertyKind},
    resource_spec::ResourceSpec,
};
