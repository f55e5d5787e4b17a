//! Order number counter
//!
//! Per-store monotonic sequence backing order-number generation.
//! The increment is a single UPSERT statement, so it is atomic with
//! respect to concurrent order creation.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "order_counter";

#[derive(Debug, serde::Deserialize)]
struct CounterRecord {
    #[allow(dead_code)]
    id: RecordId,
    value: u64,
}

#[derive(Clone)]
pub struct OrderCounterRepository {
    base: BaseRepository,
}

impl OrderCounterRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Increment and return the store's sequence value (starts at 1)
    pub async fn next_value(&self, store_id: &str) -> RepoResult<u64> {
        let store = parse_record_id("store", store_id)?;
        let counter_id = RecordId::from_table_key(TABLE, store.key().to_string());
        let mut result = self
            .base
            .db()
            .query("UPSERT $id SET value = (value ?? 0) + 1 RETURN AFTER")
            .bind(("id", counter_id))
            .await?;
        let records: Vec<CounterRecord> = result.take(0)?;
        records
            .into_iter()
            .next()
            .map(|r| r.value)
            .ok_or_else(|| RepoError::Database("Counter increment returned no row".to_string()))
    }
}
