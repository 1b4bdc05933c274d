//! Node handles and the menu context handed to applications.

use serde::{Deserialize, Serialize};

/// Lightweight handle on a node of the host's graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    /// Server id of the node.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Node type, e.g. `"Network"` or `"BIMObject"`.
    #[serde(rename = "type")]
    pub node_type: String,
}

impl NodeRef {
    /// Create a node handle.
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type: node_type.into(),
        }
    }

    /// Whether this node has the given type.
    pub fn is_type(&self, node_type: &str) -> bool {
        self.node_type == node_type
    }
}

/// What the host knows about the place a menu is being opened for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuContext {
    /// Node currently selected by the user.
    #[serde(rename = "selectedNode", default)]
    pub selected_node: Option<NodeRef>,
    /// Context node the selection belongs to.
    #[serde(default)]
    pub context: Option<NodeRef>,
}

impl MenuContext {
    /// Context with the given selection and context node.
    pub fn new(selected_node: Option<NodeRef>, context: Option<NodeRef>) -> Self {
        Self {
            selected_node,
            context,
        }
    }

    /// Whether the selected node is the context node itself.
    pub fn selection_is_context(&self) -> bool {
        match (&self.selected_node, &self.context) {
            (Some(selected), Some(context)) => selected.id == context.id,
            _ => false,
        }
    }
}
