//! Order lifecycle types

use serde::{Deserialize, Serialize};

/// Service-order status lifecycle
///
/// `RECEIVED → IN_PROGRESS ⇄ PAUSED → FINISHED → PAID`
///
/// PAID is terminal: once an order is paid no further transition is
/// accepted. PAUSED alternates freely with IN_PROGRESS.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Received,
    InProgress,
    Paused,
    Finished,
    Paid,
}

impl OrderStatus {
    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Paid)
    }

    /// Client-facing label (pt-BR), used by templates and receipts
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Received => "Recebido",
            OrderStatus::InProgress => "Em andamento",
            OrderStatus::Paused => "Pausado",
            OrderStatus::Finished => "Finalizado",
            OrderStatus::Paid => "Pago",
        }
    }

    /// All status values, in lifecycle order
    pub fn all() -> [OrderStatus; 5] {
        [
            OrderStatus::Received,
            OrderStatus::InProgress,
            OrderStatus::Paused,
            OrderStatus::Finished,
            OrderStatus::Paid,
        ]
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Received => "RECEIVED",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Paused => "PAUSED",
            OrderStatus::Finished => "FINISHED",
            OrderStatus::Paid => "PAID",
        };
        write!(f, "{}", s)
    }
}

/// Status transition request payload
///
/// `pausedReason` is only meaningful when `status = PAUSED`; for any
/// other target status it is ignored and the stored reason is cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    pub status: OrderStatus,
    #[serde(default)]
    pub paused_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_screaming_snake() {
        let json = serde_json::to_string(&OrderStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");

        let parsed: OrderStatus = serde_json::from_str("\"PAID\"").unwrap();
        assert_eq!(parsed, OrderStatus::Paid);
    }

    #[test]
    fn invalid_status_is_rejected() {
        let result = serde_json::from_str::<OrderStatus>("\"SHIPPED\"");
        assert!(result.is_err());
    }

    #[test]
    fn only_paid_is_terminal() {
        for status in OrderStatus::all() {
            assert_eq!(status.is_terminal(), status == OrderStatus::Paid);
        }
    }

    #[test]
    fn transition_request_accepts_camel_case_reason() {
        let req: TransitionRequest =
            serde_json::from_str(r#"{"status":"PAUSED","pausedReason":"aguardando peça"}"#)
                .unwrap();
        assert_eq!(req.status, OrderStatus::Paused);
        assert_eq!(req.paused_reason.as_deref(), Some("aguardando peça"));
    }
}
