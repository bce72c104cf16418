//! Filesystem utility module.

pub mod fs;
