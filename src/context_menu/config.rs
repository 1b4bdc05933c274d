//! Configuration for [`ContextMenuService`](super::ContextMenuService).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::permission::PermissionTier;

/// Quiet period the readiness gate waits for, in milliseconds.
pub const DEFAULT_QUIET_PERIOD_MS: u64 = 1000;

/// Directory holding one profile record per user.
pub const DEFAULT_PROFILE_DIR: &str = "/etc/UserProfileDir/";

/// Registry settings.
///
/// # Environment Variables
///
/// - `SPINAL_MENU_QUIET_MS`: readiness quiet period in milliseconds
/// - `SPINAL_MENU_PROFILE_DIR`: profile directory prefix
/// - `SPINAL_MENU_DEFAULT_TIER`: tier assumed when a registration omits one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextMenuConfig {
    /// How long registrations must stay quiet before menus are served.
    pub quiet_period_ms: u64,
    /// Prefix the username is appended to when loading a profile.
    pub profile_dir: String,
    /// Tier used for registrations that do not name one.
    pub default_tier: PermissionTier,
}

impl Default for ContextMenuConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: DEFAULT_QUIET_PERIOD_MS,
            profile_dir: DEFAULT_PROFILE_DIR.to_string(),
            default_tier: PermissionTier::ADMIN,
        }
    }
}

impl ContextMenuConfig {
    /// Default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by whichever `SPINAL_MENU_*` variables are set.
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(ms) = env_parse::<u64>("SPINAL_MENU_QUIET_MS") {
            config.quiet_period_ms = ms;
        }
        if let Ok(dir) = std::env::var("SPINAL_MENU_PROFILE_DIR") {
            config.profile_dir = dir;
        }
        if let Some(tier) = env_parse::<u8>("SPINAL_MENU_DEFAULT_TIER") {
            config.default_tier = PermissionTier(tier);
        }
        config
    }

    /// Set the readiness quiet period (millisecond precision).
    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period_ms = u64::try_from(quiet_period.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the profile directory prefix.
    pub fn with_profile_dir(mut self, profile_dir: impl Into<String>) -> Self {
        self.profile_dir = profile_dir.into();
        self
    }

    /// Set the tier assumed for registrations without one.
    pub fn with_default_tier(mut self, tier: PermissionTier) -> Self {
        self.default_tier = tier;
        self
    }

    /// The quiet period as a [`Duration`].
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }

    /// Virtual path of `username`'s profile record.
    pub fn profile_path(&self, username: &str) -> String {
        format!("{}{}", self.profile_dir, username)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {}: cannot parse {:?}", key, raw);
            None
        }
    }
}
