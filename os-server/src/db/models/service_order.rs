//! Service order model

use serde::{Deserialize, Serialize};
use shared::models::OrderStatus;

/// Order line item
///
/// Embedded in the order record. Immutable once the order is PAID.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub service_name: String,
    pub description: Option<String>,
    /// Unit price in currency units
    pub unit_price: f64,
    pub quantity: i32,
}

/// Service order entity
///
/// Mutated only through the state machine (status transitions) or the
/// full-edit operation that replaces line items and recomputes totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    pub id: String,
    pub store_id: String,
    pub client_id: String,
    /// Staff member who registered the order
    pub created_by: String,
    /// Human-readable number, e.g. `OS2501-0007`
    pub order_number: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    /// Total amount in currency units (sum of line totals)
    pub total_amount: f64,
    /// Only meaningful while status = PAUSED
    pub paused_reason: Option<String>,
    /// Idempotency flag: FINISHED WhatsApp notification already sent
    pub whatsapp_sent: bool,
    /// Idempotency flag: FINISHED email notification already sent
    pub email_sent: bool,
    pub created_at: i64,
    pub finished_at: Option<i64>,
    pub paid_at: Option<i64>,
}

/// Create order payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub store_id: String,
    pub client_id: String,
    pub created_by: String,
    pub items: Vec<OrderItem>,
}

/// Full-edit payload: replaces all line items
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReplaceItems {
    pub items: Vec<OrderItem>,
}
