//! Channel API Handlers
//!
//! Thin layer over the connection manager: resolve the company's
//! config, build its provider client, delegate.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::channel::ChannelStatus;
use crate::core::ServerState;
use crate::db::models::{ChannelConfig, ChannelConfigCreate};
use crate::db::repository::{ChannelConfigRepository, CompanyRepository, MessageTemplateRepository};
use crate::notify::template::default_template;
use crate::utils::validation::{
    MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::OrderStatus;

/// Create the company's channel config and seed default templates
pub async fn setup(
    State(state): State<ServerState>,
    Json(payload): Json<ChannelConfigCreate>,
) -> AppResult<Json<ChannelConfig>> {
    validate_required_text(&payload.instance_name, "instanceName", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.api_url, "apiUrl", MAX_URL_LEN)?;
    validate_required_text(&payload.api_key, "apiKey", MAX_SHORT_TEXT_LEN)?;

    let companies = CompanyRepository::new(state.db.clone());
    companies
        .find_by_id(&payload.company_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Company {} not found", payload.company_id)))?;

    let configs = ChannelConfigRepository::new(state.db.clone());
    let config = configs.create(payload).await?;

    // One default template per status, active from the start
    let templates = MessageTemplateRepository::new(state.db.clone());
    for status in OrderStatus::all() {
        templates
            .create(&config.id, status, default_template(status).to_string(), true)
            .await?;
    }

    tracing::info!(
        company = %config.company_id,
        instance = %config.instance_name,
        "Channel config created with default templates"
    );
    Ok(Json(config))
}

/// Fetch the company's channel config (credential redacted)
pub async fn get_config(
    State(state): State<ServerState>,
    Path(company_id): Path<String>,
) -> AppResult<Json<ChannelConfig>> {
    let config = find_config(&state, &company_id).await?;
    Ok(Json(config))
}

/// Drive the instance toward CONNECTED (idempotent)
pub async fn connect(
    State(state): State<ServerState>,
    Path(company_id): Path<String>,
) -> AppResult<Json<ChannelStatus>> {
    let config = find_config(&state, &company_id).await?;
    let api = state.channel_factory.for_config(&config);
    let status = state
        .channel_manager()
        .ensure_connected(&config, api.as_ref())
        .await?;
    Ok(Json(status))
}

/// Request a scannable pairing code
pub async fn pairing_code(
    State(state): State<ServerState>,
    Path(company_id): Path<String>,
) -> AppResult<Json<ChannelStatus>> {
    let config = find_config(&state, &company_id).await?;
    let api = state.channel_factory.for_config(&config);
    let status = state
        .channel_manager()
        .pairing_code(&config, api.as_ref())
        .await?;
    Ok(Json(status))
}

/// Single status check (the frontend polls this while pairing)
pub async fn status(
    State(state): State<ServerState>,
    Path(company_id): Path<String>,
) -> AppResult<Json<ChannelStatus>> {
    let config = find_config(&state, &company_id).await?;
    let api = state.channel_factory.for_config(&config);
    let status = state
        .channel_manager()
        .poll_status(&config, api.as_ref())
        .await?;
    Ok(Json(status))
}

/// Log out and persist DISCONNECTED
pub async fn disconnect(
    State(state): State<ServerState>,
    Path(company_id): Path<String>,
) -> AppResult<Json<ChannelStatus>> {
    let config = find_config(&state, &company_id).await?;
    let api = state.channel_factory.for_config(&config);
    let status = state
        .channel_manager()
        .disconnect(&config, api.as_ref())
        .await?;
    Ok(Json(status))
}

async fn find_config(state: &ServerState, company_id: &str) -> AppResult<ChannelConfig> {
    let configs = ChannelConfigRepository::new(state.db.clone());
    configs
        .find_by_company(company_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Company {} has no channel config", company_id))
        })
}
