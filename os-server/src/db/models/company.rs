//! Company model (tenant root)

use serde::{Deserialize, Serialize};

/// Company entity (tenant root): owns stores and a single channel config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub document: Option<String>,
    pub created_at: i64,
}

/// Create company payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyCreate {
    pub name: String,
    pub document: Option<String>,
}
