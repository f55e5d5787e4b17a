//! Message template model

use serde::{Deserialize, Serialize};
use shared::models::OrderStatus;

/// Tenant-configurable notification template
///
/// One template fires per order-status value. Default templates are
/// seeded at channel setup and can only be deactivated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageTemplate {
    pub id: String,
    pub channel_config_id: String,
    pub trigger_status: OrderStatus,
    /// Text with `{{variable}}` placeholders
    pub content: String,
    pub is_active: bool,
    pub is_default: bool,
    pub created_at: i64,
}

/// Create template payload (custom templates)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageTemplateCreate {
    pub company_id: String,
    pub trigger_status: OrderStatus,
    pub content: String,
}

/// Update template payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageTemplateUpdate {
    pub content: Option<String>,
    pub is_active: Option<bool>,
}
