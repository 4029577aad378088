//! # Tasklist Shared Library
//!
//! This crate contains the data models, authentication primitives, and the
//! task access-control layer used by the Tasklist API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and store queries
//! - `auth`: Password hashing and JWT utilities
//! - `tasks`: Ownership checks and filtered/paginated task views
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;
pub mod tasks;

/// Current version of the Tasklist shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
