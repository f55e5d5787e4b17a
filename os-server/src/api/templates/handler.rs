//! Template API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{MessageTemplate, MessageTemplateCreate, MessageTemplateUpdate};
use crate::db::repository::{ChannelConfigRepository, MessageTemplateRepository};
use crate::utils::validation::{MAX_TEMPLATE_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ok};

/// Query params for listing templates
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Company id whose templates are listed
    pub company: String,
}

/// List a company's templates
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<MessageTemplate>>> {
    let config = find_config(&state, &query.company).await?;
    let templates = MessageTemplateRepository::new(state.db.clone())
        .list_by_config(&config.id)
        .await?;
    Ok(Json(templates))
}

/// Create a custom template
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MessageTemplateCreate>,
) -> AppResult<Json<MessageTemplate>> {
    validate_required_text(&payload.content, "content", MAX_TEMPLATE_LEN)?;

    let config = find_config(&state, &payload.company_id).await?;
    let template = MessageTemplateRepository::new(state.db.clone())
        .create(&config.id, payload.trigger_status, payload.content, false)
        .await?;
    Ok(Json(template))
}

/// Update template content or active flag
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MessageTemplateUpdate>,
) -> AppResult<Json<MessageTemplate>> {
    if let Some(content) = &payload.content {
        validate_required_text(content, "content", MAX_TEMPLATE_LEN)?;
    }
    let template = MessageTemplateRepository::new(state.db.clone())
        .update(&id, payload)
        .await?;
    Ok(Json(template))
}

/// Delete a custom template (defaults can only be deactivated)
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<crate::utils::AppResponse<()>>> {
    MessageTemplateRepository::new(state.db.clone())
        .delete(&id)
        .await?;
    Ok(ok(()))
}

async fn find_config(
    state: &ServerState,
    company_id: &str,
) -> AppResult<crate::db::models::ChannelConfig> {
    ChannelConfigRepository::new(state.db.clone())
        .find_by_company(company_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Company {} has no channel config", company_id))
        })
}
