//! The context menu registry.
//!
//! Plugins call [`ContextMenuService::register_app`] while the host boots.
//! Each registration names a hook (the place in the UI the button goes)
//! and the permission tier required to see it. The tier is checked once
//! against the current user's profile; applications whose tier is granted
//! are admitted into the hook's list.
//!
//! Menu renderers call [`ContextMenuService::get_apps`], which waits for the
//! readiness gate (see [`ReadyGate`]) and then asks every admitted
//! application whether it is shown for the given context.

use std::collections::HashMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{join_all, FutureExt};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::app::{same_app, AppHandle};
use super::config::ContextMenuConfig;
use super::error::{MenuError, SessionError};
use super::permission::{PermissionCache, PermissionTier, UserProfile};
use super::ready_gate::ReadyGate;
use crate::host::{MenuContext, SessionProvider};

struct Registered {
    seq: u64,
    app: AppHandle,
}

struct Inner {
    config: ContextMenuConfig,
    session: Arc<dyn SessionProvider>,
    /// Admitted applications per hook, ordered by registration sequence.
    apps: Mutex<HashMap<String, Vec<Registered>>>,
    permissions: PermissionCache,
    ready: ReadyGate,
    next_seq: AtomicU64,
}

/// Registry of applications per hook, gated by the user's permission tiers.
///
/// Cloning is cheap and yields a handle on the same registry. Methods that
/// start background work (`register_app`, `has_user_right`, `activate`)
/// must run inside a Tokio runtime; `register_app` refuses with
/// [`MenuError::NoRuntime`] outside one.
#[derive(Clone)]
pub struct ContextMenuService {
    inner: Arc<Inner>,
}

impl ContextMenuService {
    /// Create an empty registry reading permissions from `session`.
    pub fn new(config: ContextMenuConfig, session: Arc<dyn SessionProvider>) -> Self {
        let ready = ReadyGate::new(config.quiet_period());
        Self {
            inner: Arc::new(Inner {
                config,
                session,
                apps: Mutex::new(HashMap::new()),
                permissions: PermissionCache::new(),
                ready,
                next_seq: AtomicU64::new(0),
            }),
        }
    }

    /// Settings the registry was built with.
    pub fn config(&self) -> &ContextMenuConfig {
        &self.inner.config
    }

    /// Register `app` under `hook_name`, visible to users granted `tier`.
    ///
    /// Passing `None` for the tier is deprecated: a warning is logged and
    /// the configured default (admin only) is used. The permission check for
    /// a tier runs once and is shared by every registration for that tier.
    /// The application is admitted once the check passes; registering the
    /// same instance twice under one hook admits it once.
    pub fn register_app(
        &self,
        hook_name: &str,
        app: AppHandle,
        tier: impl Into<Option<PermissionTier>>,
    ) -> Result<(), MenuError> {
        if hook_name.is_empty() {
            return Err(MenuError::EmptyHookName);
        }
        let runtime = Handle::try_current().map_err(|e| {
            log::error!(
                "Cannot register {:?} on hook {:?}: {}",
                app.descriptor().label,
                hook_name,
                e
            );
            MenuError::NoRuntime
        })?;
        self.inner.ready.touch();

        let tier = match tier.into() {
            Some(tier) => tier,
            None => {
                let tier = self.inner.config.default_tier;
                log::warn!(
                    "Deprecated: registering {:?} on hook {:?} without a permission tier; \
                     the button is restricted to {} until a tier is given",
                    app.descriptor().label,
                    hook_name,
                    tier
                );
                tier
            }
        };

        let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed);
        let weak = Arc::downgrade(&self.inner);
        let check = self.inner.permissions.get_or_start(tier, move || {
            async move {
                match weak.upgrade() {
                    Some(inner) => inner.has_user_right(tier).await,
                    None => false,
                }
            }
            .boxed()
        });

        let inner = Arc::clone(&self.inner);
        let hook = hook_name.to_string();
        runtime.spawn(async move {
            if check.await {
                inner.admit(&hook, seq, app);
            } else {
                log::debug!(
                    "{:?} not admitted on hook {:?}: {} not granted",
                    app.descriptor().label,
                    hook,
                    tier
                );
            }
        });
        Ok(())
    }

    /// Whether the current user is granted `tier`.
    ///
    /// Not memoized. Any session or profile failure counts as "no".
    /// Also counts as registry activity for the readiness gate.
    pub async fn has_user_right(&self, tier: PermissionTier) -> bool {
        self.inner.has_user_right(tier).await
    }

    /// Applications of `hook_name` that are shown for `ctx`, in
    /// registration order.
    ///
    /// Waits for the readiness gate first. Predicates run concurrently; a
    /// predicate that fails or panics is logged and its application left
    /// out. An unknown hook yields an empty list.
    pub async fn get_apps(&self, hook_name: &str, ctx: &MenuContext) -> Vec<AppHandle> {
        self.inner.ready.wait().await;

        let apps = self.registered_apps(hook_name);
        if apps.is_empty() {
            return apps;
        }

        let checks = apps.iter().map(|app| {
            AssertUnwindSafe(app.is_shown(ctx))
                .catch_unwind()
                .map(move |outcome| match outcome {
                    Ok(Ok(visibility)) => visibility.is_visible(),
                    Ok(Err(e)) => {
                        log::error!(
                            "Visibility check of {:?} on hook {:?} failed: {}",
                            app.descriptor().label,
                            hook_name,
                            e
                        );
                        false
                    }
                    Err(_) => {
                        log::error!(
                            "Visibility check of {:?} on hook {:?} panicked",
                            app.descriptor().label,
                            hook_name
                        );
                        false
                    }
                })
        });
        let shown = join_all(checks).await;

        apps.into_iter()
            .zip(shown)
            .filter_map(|(app, shown)| shown.then_some(app))
            .collect()
    }

    /// Wait until the registration burst has settled.
    pub async fn wait_ready(&self) {
        self.inner.ready.wait().await;
    }

    /// Whether the readiness gate has resolved.
    pub fn is_ready(&self) -> bool {
        self.inner.ready.is_ready()
    }

    /// Admitted applications of `hook_name`, without visibility filtering.
    pub fn registered_apps(&self, hook_name: &str) -> Vec<AppHandle> {
        self.inner
            .apps
            .lock()
            .get(hook_name)
            .map(|list| list.iter().map(|entry| Arc::clone(&entry.app)).collect())
            .unwrap_or_default()
    }

    /// Hooks that have at least one admitted application, sorted.
    pub fn hooks(&self) -> Vec<String> {
        let mut hooks: Vec<String> = self
            .inner
            .apps
            .lock()
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(hook, _)| hook.clone())
            .collect();
        hooks.sort();
        hooks
    }

    /// The per-tier permission check cache.
    pub fn permissions(&self) -> &PermissionCache {
        &self.inner.permissions
    }

    /// Run `app`'s action for `ctx` in the background.
    ///
    /// A failed action is logged; the returned handle only reports
    /// completion.
    pub fn activate(&self, app: AppHandle, ctx: MenuContext) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = app.action(&ctx).await {
                log::error!("Action of {:?} failed: {}", app.descriptor().label, e);
            }
        })
    }
}

impl Inner {
    async fn has_user_right(&self, tier: PermissionTier) -> bool {
        self.ready.touch();
        match AssertUnwindSafe(self.current_profile()).catch_unwind().await {
            Ok(Ok(Some(profile))) => profile.grants(tier),
            Ok(Ok(None)) => {
                log::warn!("No user profile found; denying {}", tier);
                false
            }
            Ok(Err(e)) => {
                log::warn!("Could not load user profile ({}); denying {}", e, tier);
                false
            }
            Err(_) => {
                log::warn!("Session panicked while loading the user profile; denying {}", tier);
                false
            }
        }
    }

    async fn current_profile(&self) -> Result<Option<UserProfile>, SessionError> {
        self.session.init().await?;
        let user = self.session.current_user()?;
        let path = self.config.profile_path(&user.username);
        self.session.load_profile(&path).await
    }

    /// Insert `app` under `hook` in sequence order unless already present.
    fn admit(&self, hook: &str, seq: u64, app: AppHandle) {
        let mut apps = self.apps.lock();
        let list = apps.entry(hook.to_string()).or_default();
        if list.iter().any(|entry| same_app(&entry.app, &app)) {
            return;
        }
        log::debug!("Admitted {:?} on hook {:?}", app.descriptor().label, hook);
        let pos = list.partition_point(|entry| entry.seq < seq);
        list.insert(pos, Registered { seq, app });
    }
}

impl fmt::Debug for ContextMenuService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let apps = self.inner.apps.lock();
        let counts: HashMap<&str, usize> =
            apps.iter().map(|(hook, list)| (hook.as_str(), list.len())).collect();
        f.debug_struct("ContextMenuService")
            .field("config", &self.inner.config)
            .field("apps", &counts)
            .field("permissions", &self.inner.permissions)
            .field("ready", &self.inner.ready.is_ready())
            .finish()
    }
}
