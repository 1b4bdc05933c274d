//! Session collaborator: the logged-in user and their profile records.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context_menu::error::SessionError;
use crate::context_menu::permission::UserProfile;

/// The user of the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Login name, used to locate the profile record.
    pub username: String,
}

impl SessionUser {
    /// User with the given login name.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Access to the host session.
///
/// Profile records are addressed by a virtual path built from the
/// configured profile directory and the username.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Wait until the session is usable.
    async fn init(&self) -> Result<(), SessionError>;

    /// The logged-in user.
    fn current_user(&self) -> Result<SessionUser, SessionError>;

    /// Load the profile record stored at `path`, or `None` if there is none.
    async fn load_profile(&self, path: &str) -> Result<Option<UserProfile>, SessionError>;
}

/// In-memory session with a fixed user and profile table.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    user: Option<SessionUser>,
    profiles: HashMap<String, UserProfile>,
}

impl StaticSession {
    /// Session for `username` with no profile records.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            user: Some(SessionUser::new(username)),
            profiles: HashMap::new(),
        }
    }

    /// Session with nobody logged in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Store `profile` at `path`.
    pub fn with_profile(mut self, path: impl Into<String>, profile: UserProfile) -> Self {
        self.profiles.insert(path.into(), profile);
        self
    }
}

#[async_trait]
impl SessionProvider for StaticSession {
    async fn init(&self) -> Result<(), SessionError> {
        Ok(())
    }

    fn current_user(&self) -> Result<SessionUser, SessionError> {
        self.user.clone().ok_or(SessionError::NoUser)
    }

    async fn load_profile(&self, path: &str) -> Result<Option<UserProfile>, SessionError> {
        Ok(self.profiles.get(path).cloned())
    }
}

/// Session whose profile records are JSON files under a root directory.
///
/// The virtual path `/etc/UserProfileDir/alice` maps to
/// `<root>/etc/UserProfileDir/alice.json`.
#[derive(Debug, Clone)]
pub struct ProfileDirectorySession {
    root: PathBuf,
    user: SessionUser,
}

impl ProfileDirectorySession {
    /// Session for `user` reading profiles under `root`.
    pub fn new(root: impl Into<PathBuf>, user: SessionUser) -> Self {
        Self {
            root: root.into(),
            user,
        }
    }

    /// The file backing a virtual profile path.
    pub fn file_for(&self, path: &str) -> PathBuf {
        let relative = path.trim_start_matches('/');
        self.root.join(format!("{relative}.json"))
    }

    /// The directory profile files are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl SessionProvider for ProfileDirectorySession {
    async fn init(&self) -> Result<(), SessionError> {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(SessionError::NotInitialized(format!(
                "{} is not a directory",
                self.root.display()
            ))),
            Err(e) => Err(SessionError::NotInitialized(format!(
                "{}: {}",
                self.root.display(),
                e
            ))),
        }
    }

    fn current_user(&self) -> Result<SessionUser, SessionError> {
        Ok(self.user.clone())
    }

    async fn load_profile(&self, path: &str) -> Result<Option<UserProfile>, SessionError> {
        let file = self.file_for(path);
        let content = match tokio::fs::read_to_string(&file).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context_menu::permission::PermissionTier;

    #[tokio::test]
    async fn test_static_session_lookup() {
        let session = StaticSession::new("alice")
            .with_profile("/etc/UserProfileDir/alice", UserProfile::with_tiers([PermissionTier(1)]));

        session.init().await.unwrap();
        assert_eq!(session.current_user().unwrap().username, "alice");
        assert!(session.load_profile("/etc/UserProfileDir/alice").await.unwrap().is_some());
        assert!(session.load_profile("/etc/UserProfileDir/bob").await.unwrap().is_none());
    }

    #[test]
    fn test_anonymous_session_has_no_user() {
        let session = StaticSession::anonymous();
        assert!(matches!(session.current_user(), Err(SessionError::NoUser)));
    }

    #[tokio::test]
    async fn test_directory_session_reads_json_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let profile_dir = dir.path().join("etc/UserProfileDir");
        std::fs::create_dir_all(&profile_dir).unwrap();
        std::fs::write(profile_dir.join("alice.json"), r#"{"appProfiles":[0,1]}"#).unwrap();
        std::fs::write(profile_dir.join("broken.json"), "not json").unwrap();

        let session = ProfileDirectorySession::new(dir.path(), SessionUser::new("alice"));
        session.init().await.unwrap();

        let profile = session
            .load_profile("/etc/UserProfileDir/alice")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.app_profiles, vec![PermissionTier(0), PermissionTier(1)]);

        assert!(session.load_profile("/etc/UserProfileDir/carol").await.unwrap().is_none());
        assert!(matches!(
            session.load_profile("/etc/UserProfileDir/broken").await,
            Err(SessionError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_directory_session_requires_existing_root() {
        let dir = tempfile::tempdir().unwrap();
        let session =
            ProfileDirectorySession::new(dir.path().join("missing"), SessionUser::new("alice"));
        assert!(matches!(session.init().await, Err(SessionError::NotInitialized(_))));
    }
}
