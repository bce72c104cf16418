//! Local user administration CLI for the Hearth hub.
//!
//! Manages the hub's username/password provider store: listing users,
//! creating them, validating logins, and changing passwords.
//!
//! ## Modules
//! - `cli` — Command-line handlers
//! - `core` — Store, hashing, paths, audit
//! - `models` — On-disk data structures
//! - `util` — Filesystem helpers

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod util;
