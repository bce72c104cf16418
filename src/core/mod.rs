//! Core store logic.

pub mod audit_log;
pub mod file_lock;
pub mod hash;
pub mod paths;
pub mod store;
