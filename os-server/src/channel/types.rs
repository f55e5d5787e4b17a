//! Channel connection types

use serde::{Deserialize, Serialize};

/// Local view of a tenant's channel instance state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Provider-reported instance state
#[derive(Debug, Clone)]
pub struct InstanceState {
    pub state: ConnectionState,
    /// Paired address once the instance is connected
    pub paired_number: Option<String>,
}

/// Scannable pairing code for authorizing an instance
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingCode {
    pub code: String,
}

/// Connection status returned to API callers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatus {
    pub state: ConnectionState,
    pub phone_number: Option<String>,
    /// Present when instance creation yielded a code synchronously
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pairing_code: Option<String>,
}
