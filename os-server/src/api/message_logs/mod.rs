//! Message Log API Module
//!
//! Read-only access to the dispatch audit trail.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Message log router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/message-logs", get(handler::list))
}
