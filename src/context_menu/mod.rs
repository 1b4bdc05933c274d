//! # Context Menu Registry
//!
//! Lets viewer plugins place applications (buttons) on named hooks of the
//! host UI, and lets the host ask which applications to show.
//!
//! ## Flow
//!
//! 1. A plugin builds its [`ContextApp`] and calls
//!    [`ContextMenuService::register_app`] with a hook name and a
//!    [`PermissionTier`].
//! 2. The registry checks once per tier whether the current user is granted
//!    it, and admits the application if so.
//! 3. When registrations have been quiet for the configured period, the
//!    [`ReadyGate`] opens.
//! 4. The host calls [`ContextMenuService::get_apps`] with the hook and a
//!    [`MenuContext`](crate::host::MenuContext); every admitted application
//!    is asked whether it is shown, and the visible ones come back in
//!    registration order.

pub mod app;
pub mod config;
pub mod error;
pub mod permission;
pub mod ready_gate;
pub mod service;

pub use app::{same_app, AppDescriptor, AppHandle, ButtonConfig, ContextApp, Visibility};
pub use config::ContextMenuConfig;
pub use error::{AppError, MenuError, SessionError};
pub use permission::{PermissionCache, PermissionTier, UserProfile};
pub use ready_gate::ReadyGate;
pub use service::ContextMenuService;
