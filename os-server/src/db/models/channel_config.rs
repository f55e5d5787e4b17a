//! Channel config model

use serde::{Deserialize, Serialize};

/// Messaging-channel identity of a company
///
/// Exactly one per company. Created once by the explicit setup
/// operation; `is_connected`/`phone_number` are maintained by the
/// connection manager. The API key never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelConfig {
    pub id: String,
    pub company_id: String,
    pub instance_name: String,
    pub api_url: String,
    /// Provider credential (kept out of API responses)
    #[serde(skip_serializing, default)]
    pub api_key: String,
    pub is_connected: bool,
    /// Paired address once connected
    pub phone_number: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Channel setup payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelConfigCreate {
    pub company_id: String,
    pub instance_name: String,
    pub api_url: String,
    pub api_key: String,
}
