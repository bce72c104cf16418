//! On-disk data structures.

pub mod user;
