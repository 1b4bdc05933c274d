//! Permission tiers, user profile records and the per-tier check cache.
//!
//! A user profile lists the tiers granted to the user. Bit `i` of the
//! profile's granted mask corresponds to tier `i`; an application
//! registered for tier `t` is visible iff bit `t` is set.

use std::collections::HashMap;
use std::fmt;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// A permission tier. Lower is more restrictive; tier 0 is admin only.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PermissionTier(pub u8);

impl PermissionTier {
    /// The admin tier, used whenever a registration omits its tier.
    pub const ADMIN: PermissionTier = PermissionTier(0);

    /// The bit this tier occupies in a granted mask, if it fits in one.
    pub fn bit(self) -> Option<u64> {
        1u64.checked_shl(u32::from(self.0))
    }
}

impl Default for PermissionTier {
    fn default() -> Self {
        Self::ADMIN
    }
}

impl fmt::Display for PermissionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tier {}", self.0)
    }
}

/// The profile record stored by the host for each user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Tiers granted to the user.
    #[serde(rename = "appProfiles", default)]
    pub app_profiles: Vec<PermissionTier>,
}

impl UserProfile {
    /// Create a profile granting the given tiers.
    pub fn with_tiers(tiers: impl IntoIterator<Item = PermissionTier>) -> Self {
        Self {
            app_profiles: tiers.into_iter().collect(),
        }
    }

    /// Bitmask of every granted tier. Tiers outside the mask are ignored.
    pub fn granted_mask(&self) -> u64 {
        self.app_profiles
            .iter()
            .filter_map(|tier| tier.bit())
            .fold(0, |mask, bit| mask | bit)
    }

    /// Whether this profile grants `tier`.
    pub fn grants(&self, tier: PermissionTier) -> bool {
        tier.bit()
            .map_or(false, |bit| self.granted_mask() & bit != 0)
    }
}

/// A permission check shared between every registration for one tier.
pub type PermissionCheck = Shared<BoxFuture<'static, bool>>;

/// Memoizes one permission check per tier for the lifetime of the cache.
///
/// Entries are installed before the check has resolved, so concurrent
/// registrations for a tier await the same in-flight lookup. Nothing is
/// ever evicted.
#[derive(Default)]
pub struct PermissionCache {
    checks: Mutex<HashMap<PermissionTier, PermissionCheck>>,
}

impl PermissionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the check for `tier`, installing `start()` if there is none yet.
    ///
    /// `start` is called at most once per tier.
    pub fn get_or_start<F>(&self, tier: PermissionTier, start: F) -> PermissionCheck
    where
        F: FnOnce() -> BoxFuture<'static, bool>,
    {
        self.checks
            .lock()
            .entry(tier)
            .or_insert_with(|| start().shared())
            .clone()
    }

    /// Whether a check for `tier` has been started.
    pub fn contains(&self, tier: PermissionTier) -> bool {
        self.checks.lock().contains_key(&tier)
    }

    /// Number of tiers with a started check.
    pub fn len(&self) -> usize {
        self.checks.lock().len()
    }

    /// Whether no check has been started yet.
    pub fn is_empty(&self) -> bool {
        self.checks.lock().is_empty()
    }
}

impl fmt::Debug for PermissionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tiers: Vec<PermissionTier> = self.checks.lock().keys().copied().collect();
        tiers.sort();
        f.debug_struct("PermissionCache").field("tiers", &tiers).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_profile_grants_listed_tiers_only() {
        let profile = UserProfile::with_tiers([PermissionTier(1), PermissionTier(3)]);

        assert_eq!(profile.granted_mask(), 0b1010);
        assert!(profile.grants(PermissionTier(1)));
        assert!(profile.grants(PermissionTier(3)));
        assert!(!profile.grants(PermissionTier::ADMIN));
        assert!(!profile.grants(PermissionTier(2)));
    }

    #[test]
    fn test_out_of_range_tier_is_never_granted() {
        let profile = UserProfile::with_tiers([PermissionTier(64), PermissionTier(200)]);

        assert_eq!(profile.granted_mask(), 0);
        assert!(!profile.grants(PermissionTier(64)));
        assert_eq!(PermissionTier(63).bit(), Some(1 << 63));
        assert_eq!(PermissionTier(64).bit(), None);
    }

    #[test]
    fn test_profile_json_uses_host_field_name() {
        let profile: UserProfile = serde_json::from_str(r#"{"appProfiles":[0,2]}"#).unwrap();
        assert_eq!(profile.app_profiles, vec![PermissionTier(0), PermissionTier(2)]);

        let empty: UserProfile = serde_json::from_str("{}").unwrap();
        assert!(empty.app_profiles.is_empty());
    }

    #[tokio::test]
    async fn test_cache_starts_each_tier_once() {
        let cache = PermissionCache::new();
        let started = Arc::new(AtomicUsize::new(0));

        let mut checks = Vec::new();
        for _ in 0..4 {
            let started = Arc::clone(&started);
            checks.push(cache.get_or_start(PermissionTier(2), move || {
                started.fetch_add(1, Ordering::SeqCst);
                async { true }.boxed()
            }));
        }

        for check in checks {
            assert!(check.await);
        }
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(PermissionTier(2)));
        assert!(!cache.contains(PermissionTier(1)));
    }

    #[tokio::test]
    async fn test_cache_keeps_denied_result() {
        let cache = PermissionCache::new();

        let denied = cache.get_or_start(PermissionTier(5), || async { false }.boxed());
        assert!(!denied.await);

        let again = cache.get_or_start(PermissionTier(5), || async { true }.boxed());
        assert!(!again.await);
    }
}
