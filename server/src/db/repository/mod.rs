//! Repository Module
//!
//! CRUD and query access to the SurrealDB tables. Multi-statement
//! transactions (order placement, ledger mutation) live with their
//! services; repositories stay read/write-simple.

pub mod account_ledger;
pub mod menu_item;
pub mod order;

pub use account_ledger::AccountLedgerRepository;
pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
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

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
///
/// Ids cross the API boundary as `"table:id"` strings and are parsed
/// with `str::parse::<RecordId>()`.
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
