//! Message log storage
//!
//! Append-only design: only `append` and query methods, no update or
//! delete interface. One row per dispatch attempt.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MessageLog, MessageLogEntry};
use shared::models::{DispatchChannel, MessageStatus};
use shared::util::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "message_log";

#[derive(Debug, serde::Deserialize)]
struct MessageLogRecord {
    id: RecordId,
    channel: DispatchChannel,
    destination: String,
    message: String,
    status: MessageStatus,
    error: Option<String>,
    order_number: Option<String>,
    timestamp: i64,
}

#[derive(Debug, serde::Serialize)]
struct MessageLogInsert {
    channel: DispatchChannel,
    destination: String,
    message: String,
    status: MessageStatus,
    error: Option<String>,
    order_number: Option<String>,
    timestamp: i64,
}

impl From<MessageLogRecord> for MessageLog {
    fn from(r: MessageLogRecord) -> Self {
        MessageLog {
            id: r.id.to_string(),
            channel: r.channel,
            destination: r.destination,
            message: r.message,
            status: r.status,
            error: r.error,
            order_number: r.order_number,
            timestamp: r.timestamp,
        }
    }
}

#[derive(Clone)]
pub struct MessageLogRepository {
    base: BaseRepository,
}

impl MessageLogRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Append one dispatch-attempt row
    pub async fn append(&self, entry: MessageLogEntry) -> RepoResult<MessageLog> {
        let insert = MessageLogInsert {
            channel: entry.channel,
            destination: entry.destination,
            message: entry.message,
            status: entry.status,
            error: entry.error,
            order_number: entry.order_number,
            timestamp: now_millis(),
        };
        let created: Option<MessageLogRecord> =
            self.base.db().create(TABLE).content(insert).await?;
        created
            .map(Into::into)
            .ok_or_else(|| RepoError::Database("Failed to append message log".to_string()))
    }

    /// Query recent rows, newest first, optionally filtered by order number
    pub async fn query_recent(
        &self,
        order_number: Option<String>,
        limit: usize,
    ) -> RepoResult<Vec<MessageLog>> {
        let records: Vec<MessageLogRecord> = if let Some(number) = order_number {
            self.base
                .db()
                .query(format!(
                    "SELECT * FROM message_log WHERE order_number = $number \
                     ORDER BY timestamp DESC LIMIT {limit}"
                ))
                .bind(("number", number))
                .await?
                .take(0)?
        } else {
            self.base
                .db()
                .query(format!(
                    "SELECT * FROM message_log ORDER BY timestamp DESC LIMIT {limit}"
                ))
                .await?
                .take(0)?
        };
        Ok(records.into_iter().map(Into::into).collect())
    }
}
