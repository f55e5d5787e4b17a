//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`orders`] - order creation, listing and status transitions
//! - [`channel`] - channel setup, pairing and connection lifecycle
//! - [`templates`] - notification template management
//! - [`message_logs`] - dispatch audit trail
//! - [`tenancy`] - company/store/client bootstrap

pub mod channel;
pub mod health;
pub mod message_logs;
pub mod orders;
pub mod templates;
pub mod tenancy;

use axum::Router;

use crate::core::ServerState;

/// Compose the full API router
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(channel::router())
        .merge(templates::router())
        .merge(message_logs::router())
        .merge(tenancy::router())
}
