//! # Spinal Context Menu
//!
//! Hook-based application registry for viewer plugins.
//!
//! Plugins register buttons against named hooks of the host viewer
//! ([`context_menu::ContextMenuService::register_app`]); each registration
//! is gated by a permission tier checked against the logged-in user's
//! profile. The host's menu renderer asks for the buttons to show on a hook
//! for the current selection
//! ([`context_menu::ContextMenuService::get_apps`]).
//!
//! The host is reached only through the traits in [`host`]: the session
//! (user and profile records) and the panel manager. [`buttons`] holds the
//! buttons shipped with the connector plugin.

pub mod buttons;
pub mod context_menu;
pub mod host;

pub use context_menu::{
    AppDescriptor, AppError, AppHandle, ButtonConfig, ContextApp, ContextMenuConfig,
    ContextMenuService, MenuError, PermissionTier, SessionError, UserProfile, Visibility,
};
pub use host::{MenuContext, NodeRef, PanelManager, SessionProvider};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
