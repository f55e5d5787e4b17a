//! Message log model

use serde::{Deserialize, Serialize};
use shared::models::{DispatchChannel, MessageStatus};

/// Immutable audit record of one dispatch attempt
///
/// Append-only: retried dispatches create new rows, nothing is ever
/// updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageLog {
    pub id: String,
    pub channel: DispatchChannel,
    pub destination: String,
    /// Rendered message text, or a document marker (`[documento] <file>`)
    pub message: String,
    pub status: MessageStatus,
    pub error: Option<String>,
    pub order_number: Option<String>,
    pub timestamp: i64,
}

/// Payload for appending one log row
#[derive(Debug, Clone)]
pub struct MessageLogEntry {
    pub channel: DispatchChannel,
    pub destination: String,
    pub message: String,
    pub status: MessageStatus,
    pub error: Option<String>,
    pub order_number: Option<String>,
}
