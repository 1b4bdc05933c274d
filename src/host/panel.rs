//! Panel manager collaborator.

/// Opens the host's named panels.
///
/// Opening a panel is a UI side effect; the caller does not wait on it.
pub trait PanelManager: Send + Sync {
    /// Open `panel_name` against the node identified by `target_id`.
    fn open_panel(&self, panel_name: &str, target_id: &str);
}
