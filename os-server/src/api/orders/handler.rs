//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{OrderCreate, OrderReplaceItems, ServiceOrder};
use crate::db::repository::ServiceOrderRepository;
use crate::utils::{AppError, AppResult};
use shared::models::TransitionRequest;

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Store id the listing is scoped to
    pub store: String,
}

/// Create an order (status RECEIVED, generated number)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<ServiceOrder>> {
    let order = state.order_machine().create_order(payload).await?;
    Ok(Json(order))
}

/// List a store's orders, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ServiceOrder>>> {
    let repo = ServiceOrderRepository::new(state.db.clone());
    let orders = repo.list_by_store(&query.store).await?;
    Ok(Json(orders))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ServiceOrder>> {
    let repo = ServiceOrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    Ok(Json(order))
}

/// Status transition endpoint
///
/// Returns the updated order; notification outcomes never change the
/// response code.
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TransitionRequest>,
) -> AppResult<Json<ServiceOrder>> {
    let order = state.order_machine().request_transition(&id, payload).await?;
    Ok(Json(order))
}

/// Full edit: replace line items and recompute the total
pub async fn replace_items(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderReplaceItems>,
) -> AppResult<Json<ServiceOrder>> {
    let order = state
        .order_machine()
        .replace_items(&id, payload.items)
        .await?;
    Ok(Json(order))
}
