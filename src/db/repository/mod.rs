//! Repository Module
//!
//! CRUD operations as free async functions on `&SqlitePool`. Functions
//! that must run inside a caller-owned transaction take
//! `&mut SqliteConnection` instead.

pub mod category;
pub mod discount;
pub mod employee;
pub mod menu_item;
pub mod order;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
