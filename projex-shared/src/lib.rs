//! # ProjeX Shared Library
//!
//! Shared types and business logic used by the ProjeX API server.
//!
//! ## Module Organization
//!
//! - `models`: database models (users, projects, tasks)
//! - `auth`: authentication primitives (JWT, password hashing, guard)
//! - `db`: connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the ProjeX shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
