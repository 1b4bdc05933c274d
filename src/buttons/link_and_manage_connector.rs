//! "Link And Manage Innvia Connector" button.
//!
//! Shown on a network context when the network itself is selected; opens
//! the connector management panel for it.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::context_menu::{AppDescriptor, AppError, ButtonConfig, ContextApp, Visibility};
use crate::host::{MenuContext, PanelManager};

const LABEL: &str = "Link And Manage Innvia Connector";

/// Panel opened by the button.
pub const PANEL_NAME: &str = "LinkAndManageConnector";

/// Node type the button applies to.
pub const NETWORK_TYPE: &str = "Network";

/// Opens the connector management panel for a selected network.
pub struct LinkAndManageConnectorButton {
    descriptor: AppDescriptor,
    panels: Arc<dyn PanelManager>,
}

impl LinkAndManageConnectorButton {
    /// Button opening its panel through `panels`.
    pub fn new(panels: Arc<dyn PanelManager>) -> Self {
        Self {
            descriptor: AppDescriptor::new(
                LABEL,
                LABEL,
                ButtonConfig::new("settings_ethernet", "in", "#000000", "#ffffff"),
            ),
            panels,
        }
    }
}

#[async_trait]
impl ContextApp for LinkAndManageConnectorButton {
    fn descriptor(&self) -> &AppDescriptor {
        &self.descriptor
    }

    async fn is_shown(&self, ctx: &MenuContext) -> Result<Visibility, AppError> {
        let on_network = ctx.selection_is_context()
            && ctx
                .selected_node
                .as_ref()
                .map_or(false, |node| node.is_type(NETWORK_TYPE));
        Ok(if on_network {
            Visibility::Visible
        } else {
            Visibility::NotApplicable
        })
    }

    async fn action(&self, ctx: &MenuContext) -> Result<(), AppError> {
        let node = ctx.selected_node.as_ref().ok_or(AppError::MissingSelection)?;
        self.panels.open_panel(PANEL_NAME, &node.id);
        Ok(())
    }
}

impl fmt::Debug for LinkAndManageConnectorButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkAndManageConnectorButton")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}
