//! Notification context
//!
//! Snapshot of everything a template or receipt can reference, loaded
//! once per notification job. Pure data, no I/O.

use shared::models::OrderStatus;

/// One line of the order as seen by templates and receipts
#[derive(Debug, Clone)]
pub struct ServiceLine {
    pub name: String,
    pub description: Option<String>,
    pub unit_price: f64,
    pub quantity: i32,
}

/// Order snapshot used for rendering notifications
#[derive(Debug, Clone)]
pub struct OrderContext {
    pub order_id: String,
    pub order_number: String,
    pub status: OrderStatus,
    pub client_name: String,
    /// None when the client has no phone on file (skips WhatsApp)
    pub client_phone: Option<String>,
    /// None when the client has no email on file (skips EMAIL)
    pub client_email: Option<String>,
    pub company_id: String,
    pub company_name: String,
    pub store_name: String,
    pub items: Vec<ServiceLine>,
    pub total_amount: f64,
    pub paused_reason: Option<String>,
    pub created_at: i64,
    pub finished_at: Option<i64>,
    pub paid_at: Option<i64>,
}

#[cfg(test)]
impl OrderContext {
    /// Baseline context for unit tests
    pub fn sample() -> Self {
        Self {
            order_id: "service_order:test".to_string(),
            order_number: "OS2501-0007".to_string(),
            status: OrderStatus::Received,
            client_name: "Maria Silva".to_string(),
            client_phone: Some("11999990000".to_string()),
            client_email: Some("maria@example.com".to_string()),
            company_id: "company:test".to_string(),
            company_name: "Conserta Tudo".to_string(),
            store_name: "Loja Centro".to_string(),
            items: vec![
                ServiceLine {
                    name: "Troca de tela".to_string(),
                    description: None,
                    unit_price: 100.0,
                    quantity: 1,
                },
                ServiceLine {
                    name: "Película".to_string(),
                    description: Some("Vidro temperado".to_string()),
                    unit_price: 50.0,
                    quantity: 2,
                },
            ],
            total_amount: 200.0,
            paused_reason: None,
            created_at: 1_736_942_400_000,
            finished_at: None,
            paid_at: None,
        }
    }
}
