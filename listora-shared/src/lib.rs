//! # Listora Shared Library
//!
//! This crate contains the data layer and shared utilities used by the
//! Listora API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD operations
//! - `auth`: Password hashing, JWT tokens, and auth middleware types
//! - `db`: Connection pool and migrations
//! - `storage`: Object storage backends (S3-compatible or local disk)
//! - `pagination`: Lenient page/limit parsing and the list envelope
//! - `slug`: URL slug derivation for categories

pub mod auth;
pub mod db;
pub mod models;
pub mod pagination;
pub mod slug;
pub mod storage;

/// Current version of the Listora shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
