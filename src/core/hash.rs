//! Password hashing for the local provider.
//!
//! bcrypt at cost 12; hashes are self-describing modular-crypt strings, so
//! the cost can change without invalidating stored passwords.

use crate::constants;

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, constants::BCRYPT_COST)
}

/// A corrupt or non-bcrypt stored hash verifies as false rather than erroring.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Burn one verification against a fixed hash so lookups of unknown users
/// cost the same as a wrong-password check.
pub fn burn_verify(password: &str) {
    let _ = bcrypt::verify(password, constants::DUMMY_HASH);
}
