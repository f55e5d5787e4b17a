//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

// Tenant hierarchy
pub mod client;
pub mod company;
pub mod store;

// Orders
pub mod order_counter;
pub mod service_order;

// Messaging
pub mod channel_config;
pub mod message_log;
pub mod message_template;

// Re-exports
pub use channel_config::ChannelConfigRepository;
pub use client::ClientRepository;
pub use company::CompanyRepository;
pub use message_log::MessageLogRepository;
pub use message_template::MessageTemplateRepository;
pub use order_counter::OrderCounterRepository;
pub use service_order::ServiceOrderRepository;
pub use store::StoreRepository;

use surrealdb::{RecordId, Surreal};
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

// =============================================================================
// ID Convention: "table:key" strings at the API boundary,
// surrealdb::RecordId inside the repository layer.
//   - parse: parse_record_id("service_order", id)
//   - render: record_id.to_string()
// =============================================================================

/// Parse an id string (`key` or `table:key`) into a RecordId of the
/// expected table. Rejects ids that name a different table.
pub(crate) fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    let rid: RecordId = if id.contains(':') {
        id.parse()
            .map_err(|_| RepoError::Validation(format!("Invalid id format: {id}")))?
    } else {
        RecordId::from_table_key(table, id)
    };
    if rid.table() != table {
        return Err(RepoError::Validation(format!(
            "Expected {table} id, got {id}"
        )));
    }
    Ok(rid)
}

/// Base repository with database reference
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
