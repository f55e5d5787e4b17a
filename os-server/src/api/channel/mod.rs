//! Channel API Module
//!
//! Setup and connection lifecycle of a company's messaging channel.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Channel router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/channel", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/setup", post(handler::setup))
        .route("/{company_id}", get(handler::get_config))
        .route("/{company_id}/connect", post(handler::connect))
        .route("/{company_id}/pairing-code", get(handler::pairing_code))
        .route("/{company_id}/status", get(handler::status))
        .route("/{company_id}/disconnect", post(handler::disconnect))
}
