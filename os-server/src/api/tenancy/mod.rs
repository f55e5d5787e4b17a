//! Tenancy API Module
//!
//! Minimal company/store/client bootstrap. No auth plumbing here;
//! handlers validate shapes and delegate to repositories.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Tenancy router
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/companies", post(handler::create_company))
        .route("/api/companies", get(handler::list_companies))
        .route("/api/stores", post(handler::create_store))
        .route("/api/stores", get(handler::list_stores))
        .route("/api/clients", post(handler::create_client))
        .route("/api/clients", get(handler::list_clients))
}
