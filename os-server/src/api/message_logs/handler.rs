//! Message Log API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::MessageLog;
use crate::db::repository::MessageLogRepository;
use crate::utils::AppResult;

/// Query params for the audit trail
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Filter by order number
    pub order_number: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// List dispatch attempts, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<MessageLog>>> {
    let repo = MessageLogRepository::new(state.db.clone());
    let rows = repo
        .query_recent(query.order_number, query.limit.min(500))
        .await?;
    Ok(Json(rows))
}
