//! Store model

use serde::{Deserialize, Serialize};

/// Store entity: owned by a company, owns clients and orders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: i64,
}

/// Create store payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCreate {
    pub company_id: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}
