use traylink_core::ResourceId;

/// Creation parameters for a resource.
///
/// `parent` is required for menu entries (a menu or submenu) and optional
/// for notifiers. `text` is the tooltip of a tray, the label of an entry,
/// or the app name of a notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Containing resource.
    pub parent: Option<ResourceId>,
    /// Initial text.
    pub text: Option<String>,
    /// Initial enabled state of menu entries.
    pub enabled: bool,
    /// Initial state of checkable entries.
    pub checked: bool,
}

impl Default for ResourceSpec {
    fn default() -> Self {
        Self {
            parent: None,
            text: None,
            enabled: true,
            checked: false,
        }
    }
}
