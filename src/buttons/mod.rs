//! Buttons bundled with the connector plugin.

pub mod link_and_manage_connector;

use std::sync::Arc;

pub use link_and_manage_connector::LinkAndManageConnectorButton;

use crate::context_menu::{ContextMenuService, MenuError, PermissionTier};
use crate::host::PanelManager;

/// Hook of the graph manager side bar.
pub const SIDEBAR_HOOK: &str = "GraphManagerSideBar";

/// Register every bundled button on the side bar for users granted `tier`.
pub fn register_buttons(
    service: &ContextMenuService,
    panels: Arc<dyn PanelManager>,
    tier: PermissionTier,
) -> Result<(), MenuError> {
    service.register_app(
        SIDEBAR_HOOK,
        Arc::new(LinkAndManageConnectorButton::new(panels)),
        tier,
    )
}
