//! The local username/password provider store.
//!
//! Backed by a single JSON file under the config directory. A process loads
//! the store once, performs one operation, and persists only if it mutated;
//! load and save are the only points that touch the disk.

use crate::constants;
use crate::core::hash;
use crate::core::paths::ConfigPaths;
use crate::models::user::{CredentialRecord, StoreData, UserRecord};
use crate::util::fs as auth_fs;
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Error kinds surfaced by store operations.
///
/// `InvalidAuth` and `InvalidUser` are expected outcomes the CLI maps to
/// one-line messages; anything else aborts the invocation.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password.
    #[error("invalid authentication")]
    InvalidAuth,
    /// Username unknown, or already taken when adding.
    #[error("invalid user")]
    InvalidUser,
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

#[derive(Debug)]
pub struct AuthStore {
    path: PathBuf,
    data: StoreData,
}

impl AuthStore {
    /// Load the store from disk. A missing file yields an empty store;
    /// an unreadable or unparseable one is fatal.
    pub async fn load(paths: &ConfigPaths) -> Result<Self> {
        let path = paths.store_file.clone();
        if !path.exists() {
            return Ok(Self {
                path,
                data: StoreData::default(),
            });
        }
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("read user store {}", path.display()))?;
        let data: StoreData = serde_json::from_str(&content)
            .with_context(|| format!("parse user store {}", path.display()))?;
        Ok(Self { path, data })
    }

    /// Persist the store with an atomic replace, mode 0600.
    pub async fn save(&self) -> Result<()> {
        let content =
            serde_json::to_string_pretty(&self.data).context("serialize user store")?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            auth_fs::write_atomic(&path, content.as_bytes(), constants::STORE_FILE_MODE)
        })
        .await
        .context("join store write task")??;
        Ok(())
    }

    /// Users in the order they were added.
    pub fn users(&self) -> &[UserRecord] {
        &self.data.users
    }

    fn find_user(&self, username: &str) -> Option<usize> {
        // usernames are case-sensitive
        self.data.users.iter().position(|u| u.username == username)
    }

    /// Add a new user. The username must not already be taken.
    pub fn add_user(&mut self, username: &str, password: &str) -> Result<(), AuthError> {
        if self.find_user(username).is_some() {
            return Err(AuthError::InvalidUser);
        }
        let hashed = hash::hash_password(password)?;
        self.data.users.push(UserRecord {
            username: username.to_string(),
            password: hashed,
            created_at: Some(Utc::now()),
        });
        Ok(())
    }

    /// Check a username/password pair. Unknown usernames still burn one
    /// bcrypt round so they are not timing-distinguishable from a wrong
    /// password.
    pub fn validate_login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let Some(idx) = self.find_user(username) else {
            hash::burn_verify(password);
            return Err(AuthError::InvalidAuth);
        };
        if hash::verify_password(password, &self.data.users[idx].password) {
            Ok(())
        } else {
            Err(AuthError::InvalidAuth)
        }
    }

    /// Replace the password of an existing user.
    pub fn change_password(
        &mut self,
        username: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let idx = self.find_user(username).ok_or(AuthError::InvalidUser)?;
        self.data.users[idx].password = hash::hash_password(new_password)?;
        Ok(())
    }

    /// Fetch the provider credential for `username`, creating it on first
    /// call. At most one credential exists per (provider, username) pair;
    /// `is_new` is set only on the call that created it.
    pub fn get_or_create_credential(&mut self, username: &str) -> &CredentialRecord {
        let found = self.data.credentials.iter().position(|c| {
            c.provider == constants::LOCAL_PROVIDER && c.username == username
        });
        let idx = match found {
            Some(idx) => {
                // is_new marks only the call that created the record
                self.data.credentials[idx].is_new = false;
                idx
            }
            None => {
                self.data.credentials.push(CredentialRecord {
                    id: Uuid::new_v4(),
                    provider: constants::LOCAL_PROVIDER.to_string(),
                    username: username.to_string(),
                    is_new: true,
                });
                self.data.credentials.len() - 1
            }
        };
        &self.data.credentials[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn test_paths() -> (TempDir, ConfigPaths) {
        let dir = TempDir::new().unwrap();
        let paths = ConfigPaths::from_config_dir(dir.path().to_path_buf());
        (dir, paths)
    }

    async fn loaded_store(paths: &ConfigPaths) -> AuthStore {
        AuthStore::load(paths).await.unwrap()
    }

    #[tokio::test]
    async fn test_adding_user() {
        let (_dir, paths) = test_paths();
        let mut store = loaded_store(&paths).await;
        store.add_user("test-user", "test-pass").unwrap();
        store.validate_login("test-user", "test-pass").unwrap();
    }

    #[tokio::test]
    async fn test_adding_user_duplicate_username() {
        let (_dir, paths) = test_paths();
        let mut store = loaded_store(&paths).await;
        store.add_user("test-user", "test-pass").unwrap();
        let err = store.add_user("test-user", "other-pass").unwrap_err();
        assert!(matches!(err, AuthError::InvalidUser));
        assert_eq!(store.users().len(), 1);
    }

    #[tokio::test]
    async fn test_validating_password_invalid_user() {
        let (_dir, paths) = test_paths();
        let store = loaded_store(&paths).await;
        let err = store.validate_login("non-existing", "pw").unwrap_err();
        assert!(matches!(err, AuthError::InvalidAuth));
    }

    #[tokio::test]
    async fn test_validating_password_invalid_password() {
        let (_dir, paths) = test_paths();
        let mut store = loaded_store(&paths).await;
        store.add_user("test-user", "test-pass").unwrap();
        let err = store.validate_login("test-user", "invalid-pass").unwrap_err();
        assert!(matches!(err, AuthError::InvalidAuth));
    }

    #[tokio::test]
    async fn test_changing_password() {
        let (_dir, paths) = test_paths();
        let mut store = loaded_store(&paths).await;
        store.add_user("test-user", "test-pass").unwrap();
        store.change_password("test-user", "new-pass").unwrap();

        let err = store.validate_login("test-user", "test-pass").unwrap_err();
        assert!(matches!(err, AuthError::InvalidAuth));
        store.validate_login("test-user", "new-pass").unwrap();
    }

    #[tokio::test]
    async fn test_changing_password_raises_invalid_user() {
        let (_dir, paths) = test_paths();
        let mut store = loaded_store(&paths).await;
        let err = store.change_password("non-existing", "pw").unwrap_err();
        assert!(matches!(err, AuthError::InvalidUser));
    }

    #[tokio::test]
    async fn test_saving_loading() {
        let (_dir, paths) = test_paths();
        let mut store = loaded_store(&paths).await;
        store.add_user("test-user", "test-pass").unwrap();
        store.add_user("second-user", "second-pass").unwrap();
        store.save().await.unwrap();

        let store = loaded_store(&paths).await;
        store.validate_login("test-user", "test-pass").unwrap();
        store.validate_login("second-user", "second-pass").unwrap();
    }

    #[tokio::test]
    async fn test_users_preserve_insertion_order() {
        let (_dir, paths) = test_paths();
        let mut store = loaded_store(&paths).await;
        store.add_user("zeta", "pw1").unwrap();
        store.add_user("alpha", "pw2").unwrap();
        let names: Vec<_> = store.users().iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[tokio::test]
    async fn test_usernames_case_sensitive() {
        let (_dir, paths) = test_paths();
        let mut store = loaded_store(&paths).await;
        store.add_user("Alice", "pw1").unwrap();
        store.add_user("alice", "pw2").unwrap();
        assert_eq!(store.users().len(), 2);
        store.validate_login("alice", "pw2").unwrap();
    }

    #[tokio::test]
    async fn test_store_never_persists_plaintext() {
        let (_dir, paths) = test_paths();
        let mut store = loaded_store(&paths).await;
        store.add_user("test-user", "hunter2-plaintext").unwrap();
        store.save().await.unwrap();
        let on_disk = fs::read_to_string(&paths.store_file).unwrap();
        assert!(!on_disk.contains("hunter2-plaintext"));
        assert!(on_disk.contains("test-user"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_store_file_mode() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, paths) = test_paths();
        let mut store = loaded_store(&paths).await;
        store.add_user("test-user", "test-pass").unwrap();
        store.save().await.unwrap();
        let mode = fs::metadata(&paths.store_file).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[tokio::test]
    async fn test_load_rejects_corrupt_store() {
        let (_dir, paths) = test_paths();
        fs::write(&paths.store_file, "not json").unwrap();
        assert!(AuthStore::load(&paths).await.is_err());
    }

    #[tokio::test]
    async fn test_get_or_create_credential_stable_identity() {
        let (_dir, paths) = test_paths();
        let mut store = loaded_store(&paths).await;
        store.add_user("test-user", "test-pass").unwrap();

        let first = store.get_or_create_credential("test-user").clone();
        assert!(first.is_new);
        assert_eq!(first.provider, constants::LOCAL_PROVIDER);

        let second = store.get_or_create_credential("test-user").clone();
        assert!(!second.is_new);
        assert_eq!(second.id, first.id);

        let third = store.get_or_create_credential("test-user").clone();
        assert!(!third.is_new);
        assert_eq!(third.id, first.id);
    }

    #[tokio::test]
    async fn test_credential_is_new_resets_after_reload() {
        let (_dir, paths) = test_paths();
        let mut store = loaded_store(&paths).await;
        store.get_or_create_credential("test-user");
        store.save().await.unwrap();

        let mut store = loaded_store(&paths).await;
        let cred = store.get_or_create_credential("test-user");
        assert!(!cred.is_new);
    }

    // Scenario from the tool's contract: add, validate right and wrong,
    // change password, then only the new password validates.
    #[tokio::test]
    async fn test_full_user_lifecycle() {
        let (_dir, paths) = test_paths();
        let mut store = loaded_store(&paths).await;

        store.add_user("alice", "secret1").unwrap();
        store.save().await.unwrap();

        let mut store = loaded_store(&paths).await;
        store.validate_login("alice", "secret1").unwrap();
        assert!(matches!(
            store.validate_login("alice", "wrong").unwrap_err(),
            AuthError::InvalidAuth
        ));

        store.change_password("alice", "secret2").unwrap();
        store.save().await.unwrap();

        let store = loaded_store(&paths).await;
        assert!(matches!(
            store.validate_login("alice", "secret1").unwrap_err(),
            AuthError::InvalidAuth
        ));
        store.validate_login("alice", "secret2").unwrap();
    }
}
