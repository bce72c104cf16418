//! User store file model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants;

/// Root of the `users.json` store file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub credentials: Vec<CredentialRecord>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: default_version(),
            users: Vec::new(),
            credentials: Vec::new(),
        }
    }
}

fn default_version() -> u32 {
    constants::STORE_VERSION
}

/// A local user. `password` holds a bcrypt hash, never plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Provider credential tied to a user by username. Its identity is distinct
/// from the user record it authenticates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: Uuid,
    pub provider: String,
    pub username: String,
    /// Set only on the call that created the credential; never persisted.
    #[serde(skip)]
    pub is_new: bool,
}
