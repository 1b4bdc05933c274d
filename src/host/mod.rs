//! Narrow interfaces onto the host viewer application.
//!
//! The registry never talks to the viewer directly. It sees the session
//! through [`SessionProvider`], and applications reach the UI through
//! [`PanelManager`]. Menu queries carry a [`MenuContext`].

pub mod node;
pub mod panel;
pub mod session;

pub use node::{MenuContext, NodeRef};
pub use panel::PanelManager;
pub use session::{ProfileDirectorySession, SessionProvider, SessionUser, StaticSession};
