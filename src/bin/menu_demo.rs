//! Context menu demo binary.
//!
//! Registers the bundled buttons against a profile directory and prints
//! which of them a sample context would show.
//!
//! # Usage
//!
//! ```bash
//! menu-demo <profile-root> <username> [node-type]
//! ```
//!
//! `<profile-root>/etc/UserProfileDir/<username>.json` must hold the user's
//! profile, e.g. `{"appProfiles": [0, 1]}`.
//!
//! # Environment Variables
//!
//! - `SPINAL_MENU_QUIET_MS`, `SPINAL_MENU_PROFILE_DIR`,
//!   `SPINAL_MENU_DEFAULT_TIER`: see `ContextMenuConfig`
//! - `SPINAL_MENU_TIER`: tier the bundled buttons are registered for (default: 1)
//! - `RUST_LOG`: log filter (default: "info")

use std::sync::Arc;

use anyhow::{bail, Context};
use spinal_context_menu::buttons::{register_buttons, SIDEBAR_HOOK};
use spinal_context_menu::host::{ProfileDirectorySession, SessionUser};
use spinal_context_menu::{
    ContextMenuConfig, ContextMenuService, MenuContext, NodeRef, PanelManager, PermissionTier,
};

/// Panel manager that reports panel requests on stdout.
struct PrintPanels;

impl PanelManager for PrintPanels {
    fn open_panel(&self, panel_name: &str, target_id: &str) {
        println!("open panel {panel_name} for {target_id}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let (root, username) = match (args.next(), args.next()) {
        (Some(root), Some(username)) => (root, username),
        _ => bail!("usage: menu-demo <profile-root> <username> [node-type]"),
    };
    let node_type = args.next().unwrap_or_else(|| "Network".to_string());

    let tier = match std::env::var("SPINAL_MENU_TIER") {
        Ok(raw) => PermissionTier(raw.parse().context("SPINAL_MENU_TIER must be 0-255")?),
        Err(_) => PermissionTier(1),
    };

    let config = ContextMenuConfig::from_env();
    tracing::info!(?config, %tier, "starting context menu demo");

    let session = Arc::new(ProfileDirectorySession::new(root, SessionUser::new(username)));
    let service = ContextMenuService::new(config, session);
    register_buttons(&service, Arc::new(PrintPanels), tier)?;

    let node = NodeRef::new("demo-node", "Demo node", node_type);
    let ctx = MenuContext::new(Some(node.clone()), Some(node));
    let apps = service.get_apps(SIDEBAR_HOOK, &ctx).await;

    if apps.is_empty() {
        println!("no application shown on {SIDEBAR_HOOK}");
    }
    for app in apps {
        println!("{}: {}", SIDEBAR_HOOK, app.descriptor().label);
        service.activate(app, ctx.clone()).await?;
    }
    Ok(())
}
