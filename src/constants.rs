//! Centralized constants for file names, permissions, and hashing.

/// User store file inside the config directory.
pub const STORE_FILE_NAME: &str = "users.json";

/// Lock file guarding store read-modify-write cycles.
pub const STORE_LOCK_NAME: &str = "users.lock";

/// Append-only audit trail file.
pub const AUDIT_LOG_NAME: &str = "audit.log";

/// Lock file guarding audit log appends.
pub const AUDIT_LOCK_NAME: &str = "audit.lock";

/// Permission mode for the config directory.
pub const CONFIG_DIR_MODE: u32 = 0o700;

/// Permission mode for the user store file.
pub const STORE_FILE_MODE: u32 = 0o600;

/// Permission mode for the audit log.
pub const AUDIT_LOG_MODE: u32 = 0o640;

/// On-disk store format version.
pub const STORE_VERSION: u32 = 1;

/// bcrypt work factor for password hashes.
pub const BCRYPT_COST: u32 = 12;

/// Provider tag recorded on credentials created by this tool.
pub const LOCAL_PROVIDER: &str = "local";

/// Valid bcrypt hash verified for unknown usernames so that a login check
/// against a missing user costs the same as one against a wrong password.
pub const DUMMY_HASH: &str = "$2b$12$CiuFGszHx9eNHxPuQcwBWez4CwDUrDGcbSunqyeMCf3TLdTbxuo3C";
