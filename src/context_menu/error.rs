//! Error types for the context menu registry and its collaborators.

use thiserror::Error;

/// Errors raised by a [`SessionProvider`](crate::host::SessionProvider).
///
/// None of these reach the caller of the registry: a failed profile lookup
/// is logged and treated as "access denied".
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session has not been (or could not be) initialized.
    #[error("Session not initialized: {0}")]
    NotInitialized(String),

    /// No user is logged into the session.
    #[error("No user logged in")]
    NoUser,

    /// Reading a profile record failed.
    #[error("Profile I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A profile record exists but is not a valid profile.
    #[error("Malformed profile record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors raised by a [`ContextApp`](crate::context_menu::ContextApp)
/// predicate or action.
#[derive(Debug, Error)]
pub enum AppError {
    /// The action needs a selected node and the context has none.
    #[error("No node selected")]
    MissingSelection,

    /// Any other failure, described by the application.
    #[error("Application failed: {0}")]
    Failed(String),
}

/// Errors surfaced by [`ContextMenuService`](crate::context_menu::ContextMenuService).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    /// Applications must be registered against a non-empty hook name.
    #[error("Hook name must not be empty")]
    EmptyHookName,

    /// Registration needs a Tokio runtime to run the permission check.
    #[error("No Tokio runtime available")]
    NoRuntime,
}
