//! Tenancy API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{
    Client, ClientCreate, Company, CompanyCreate, Store, StoreCreate,
};
use crate::db::repository::{ClientRepository, CompanyRepository, StoreRepository};
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

pub async fn create_company(
    State(state): State<ServerState>,
    Json(payload): Json<CompanyCreate>,
) -> AppResult<Json<Company>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let company = CompanyRepository::new(state.db.clone()).create(payload).await?;
    Ok(Json(company))
}

pub async fn list_companies(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<Company>>> {
    let companies = CompanyRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(companies))
}

pub async fn create_store(
    State(state): State<ServerState>,
    Json(payload): Json<StoreCreate>,
) -> AppResult<Json<Store>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    CompanyRepository::new(state.db.clone())
        .find_by_id(&payload.company_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Company {} not found", payload.company_id)))?;
    let store = StoreRepository::new(state.db.clone()).create(payload).await?;
    Ok(Json(store))
}

/// Query params scoping a store listing
#[derive(Debug, Deserialize)]
pub struct StoreQuery {
    pub company: String,
}

pub async fn list_stores(
    State(state): State<ServerState>,
    Query(query): Query<StoreQuery>,
) -> AppResult<Json<Vec<Store>>> {
    let stores = StoreRepository::new(state.db.clone())
        .list_by_company(&query.company)
        .await?;
    Ok(Json(stores))
}

pub async fn create_client(
    State(state): State<ServerState>,
    Json(payload): Json<ClientCreate>,
) -> AppResult<Json<Client>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    payload
        .validate()
        .map_err(|e| AppError::validation(format!("Invalid client payload: {e}")))?;

    StoreRepository::new(state.db.clone())
        .find_by_id(&payload.store_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Store {} not found", payload.store_id)))?;

    let client = ClientRepository::new(state.db.clone()).create(payload).await?;
    Ok(Json(client))
}

/// Query params scoping a client listing
#[derive(Debug, Deserialize)]
pub struct ClientQuery {
    pub store: String,
}

pub async fn list_clients(
    State(state): State<ServerState>,
    Query(query): Query<ClientQuery>,
) -> AppResult<Json<Vec<Client>>> {
    let clients = ClientRepository::new(state.db.clone())
        .list_by_store(&query.store)
        .await?;
    Ok(Json(clients))
}
