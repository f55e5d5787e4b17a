//! Notification channel types

use serde::{Deserialize, Serialize};

/// Outbound notification channel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DispatchChannel {
    Whatsapp,
    Email,
}

impl std::fmt::Display for DispatchChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchChannel::Whatsapp => write!(f, "WHATSAPP"),
            DispatchChannel::Email => write!(f, "EMAIL"),
        }
    }
}

/// Result status of one dispatch attempt, as recorded in the message log
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageStatus {
    Sent,
    Failed,
    Pending,
}
