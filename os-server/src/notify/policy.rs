//! Notification policy
//!
//! Pure decision function mapping a status transition to dispatch
//! intents. No I/O: the worker executes whatever this returns.
//!
//! Guard rules:
//! - FINISHED is the only idempotency-guarded notification (both
//!   channels). An order whose terminal-ready state is touched again
//!   before payment must not re-notify.
//! - RECEIVED/IN_PROGRESS/PAUSED fire on every entry: a service can be
//!   paused and resumed repeatedly, each warranting a fresh message.
//! - PAID always fires, with the receipt document attached. Payment is
//!   a one-time terminal transition, so no flag guards it.

use super::context::OrderContext;
use shared::models::{DispatchChannel, OrderStatus};

/// Persisted flag consulted (and claimed) before dispatching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdempotencyKey {
    WhatsappSent,
    EmailSent,
}

/// A decided-but-not-yet-executed notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchIntent {
    pub channel: DispatchChannel,
    pub needs_document: bool,
    pub idempotency: Option<IdempotencyKey>,
}

impl DispatchIntent {
    fn whatsapp(needs_document: bool, idempotency: Option<IdempotencyKey>) -> Self {
        Self {
            channel: DispatchChannel::Whatsapp,
            needs_document,
            idempotency,
        }
    }

    fn email(idempotency: Option<IdempotencyKey>) -> Self {
        Self {
            channel: DispatchChannel::Email,
            needs_document: false,
            idempotency,
        }
    }
}

/// Decide which notifications a transition triggers
///
/// Clients without a phone number produce no WhatsApp intent; clients
/// without an email produce no EMAIL intent. Neither omission is an
/// error.
pub fn decide(
    _previous: OrderStatus,
    status: OrderStatus,
    ctx: &OrderContext,
) -> Vec<DispatchIntent> {
    let has_phone = ctx.client_phone.is_some();
    let has_email = ctx.client_email.is_some();
    let mut intents = Vec::new();

    match status {
        OrderStatus::Received | OrderStatus::InProgress | OrderStatus::Paused => {
            if has_phone {
                intents.push(DispatchIntent::whatsapp(false, None));
            }
        }
        OrderStatus::Finished => {
            if has_phone {
                intents.push(DispatchIntent::whatsapp(
                    false,
                    Some(IdempotencyKey::WhatsappSent),
                ));
            }
            if has_email {
                intents.push(DispatchIntent::email(Some(IdempotencyKey::EmailSent)));
            }
        }
        OrderStatus::Paid => {
            if has_phone {
                intents.push(DispatchIntent::whatsapp(true, None));
            }
        }
    }

    intents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_statuses_fire_unguarded_whatsapp() {
        let ctx = OrderContext::sample();
        for status in [
            OrderStatus::Received,
            OrderStatus::InProgress,
            OrderStatus::Paused,
        ] {
            let intents = decide(OrderStatus::Received, status, &ctx);
            assert_eq!(intents.len(), 1, "status {status}");
            assert_eq!(intents[0].channel, DispatchChannel::Whatsapp);
            assert!(!intents[0].needs_document);
            assert_eq!(intents[0].idempotency, None);
        }
    }

    #[test]
    fn finished_is_guarded_on_both_channels() {
        let ctx = OrderContext::sample();
        let intents = decide(OrderStatus::InProgress, OrderStatus::Finished, &ctx);
        assert_eq!(intents.len(), 2);
        assert_eq!(
            intents[0],
            DispatchIntent::whatsapp(false, Some(IdempotencyKey::WhatsappSent))
        );
        assert_eq!(
            intents[1],
            DispatchIntent::email(Some(IdempotencyKey::EmailSent))
        );
    }

    #[test]
    fn paid_always_carries_document_and_no_guard() {
        let ctx = OrderContext::sample();
        let intents = decide(OrderStatus::Finished, OrderStatus::Paid, &ctx);
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].channel, DispatchChannel::Whatsapp);
        assert!(intents[0].needs_document);
        assert_eq!(intents[0].idempotency, None);
    }

    #[test]
    fn missing_email_never_produces_email_intent() {
        let mut ctx = OrderContext::sample();
        ctx.client_email = None;
        for status in OrderStatus::all() {
            let intents = decide(OrderStatus::Received, status, &ctx);
            assert!(
                intents.iter().all(|i| i.channel != DispatchChannel::Email),
                "status {status}"
            );
        }
    }

    #[test]
    fn missing_phone_skips_whatsapp_entirely() {
        let mut ctx = OrderContext::sample();
        ctx.client_phone = None;
        let intents = decide(OrderStatus::Finished, OrderStatus::Paid, &ctx);
        assert!(intents.is_empty());

        let intents = decide(OrderStatus::InProgress, OrderStatus::Finished, &ctx);
        // Email intent survives without a phone
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].channel, DispatchChannel::Email);
    }
}
