//! Client model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Client entity (the person notified about order progress)
///
/// Phone is required (WhatsApp is the primary channel); email is
/// optional and only used for the FINISHED notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub store_id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub created_at: i64,
}

/// Create client payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClientCreate {
    pub store_id: String,
    pub name: String,
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
}
