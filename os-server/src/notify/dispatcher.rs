//! Message dispatcher
//!
//! Executes one delivery over the channel provider (or the email
//! gateway) and records the attempt in the message log. Every real
//! attempt gets a row, success or failure, with enough detail to
//! diagnose problems later. A client with empty credentials
//! short-circuits to FAILED without a log row (there is nothing to
//! audit when the channel was never configured).

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::email::EmailApi;
use crate::channel::ChannelApi;
use crate::db::models::MessageLogEntry;
use crate::db::repository::MessageLogRepository;
use crate::receipt::RenderedDocument;
use shared::models::{DispatchChannel, MessageStatus};

/// Normalize a destination to the provider's required format
///
/// Strips every non-digit and guarantees the country code appears as a
/// prefix exactly once. Returns None when nothing dialable remains.
pub fn normalize_destination(raw: &str, country_code: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    if digits.starts_with(country_code) {
        Some(digits)
    } else {
        Some(format!("{country_code}{digits}"))
    }
}

pub struct MessageDispatcher {
    logs: MessageLogRepository,
    country_code: String,
}

impl MessageDispatcher {
    pub fn new(db: Surreal<Db>, country_code: String) -> Self {
        Self {
            logs: MessageLogRepository::new(db),
            country_code,
        }
    }

    /// Deliver a plain text WhatsApp message
    pub async fn send_whatsapp_text(
        &self,
        api: &dyn ChannelApi,
        destination: &str,
        message: &str,
        order_number: Option<&str>,
    ) -> MessageStatus {
        if !api.is_configured() {
            tracing::warn!("WhatsApp channel not configured, dropping dispatch");
            return MessageStatus::Failed;
        }

        let Some(to) = normalize_destination(destination, &self.country_code) else {
            self.log(
                DispatchChannel::Whatsapp,
                destination,
                message,
                MessageStatus::Failed,
                Some("Destination has no dialable digits".to_string()),
                order_number,
            )
            .await;
            return MessageStatus::Failed;
        };

        match api.send_text(&to, message).await {
            Ok(()) => {
                self.log(DispatchChannel::Whatsapp, &to, message, MessageStatus::Sent, None, order_number)
                    .await;
                MessageStatus::Sent
            }
            Err(e) => {
                tracing::warn!(to = %to, error = %e, "WhatsApp text dispatch failed");
                self.log(
                    DispatchChannel::Whatsapp,
                    &to,
                    message,
                    MessageStatus::Failed,
                    Some(e.to_string()),
                    order_number,
                )
                .await;
                MessageStatus::Failed
            }
        }
    }

    /// Deliver a WhatsApp document (media send, exclusive with text)
    pub async fn send_whatsapp_document(
        &self,
        api: &dyn ChannelApi,
        destination: &str,
        document: &RenderedDocument,
        caption: &str,
        order_number: Option<&str>,
    ) -> MessageStatus {
        if !api.is_configured() {
            tracing::warn!("WhatsApp channel not configured, dropping document dispatch");
            return MessageStatus::Failed;
        }

        let marker = format!("[documento] {}", document.filename);

        let Some(to) = normalize_destination(destination, &self.country_code) else {
            self.log(
                DispatchChannel::Whatsapp,
                destination,
                &marker,
                MessageStatus::Failed,
                Some("Destination has no dialable digits".to_string()),
                order_number,
            )
            .await;
            return MessageStatus::Failed;
        };

        match api
            .send_document(&to, &document.base64, &document.filename, Some(caption))
            .await
        {
            Ok(()) => {
                self.log(DispatchChannel::Whatsapp, &to, &marker, MessageStatus::Sent, None, order_number)
                    .await;
                MessageStatus::Sent
            }
            Err(e) => {
                tracing::warn!(to = %to, error = %e, "WhatsApp document dispatch failed");
                self.log(
                    DispatchChannel::Whatsapp,
                    &to,
                    &marker,
                    MessageStatus::Failed,
                    Some(e.to_string()),
                    order_number,
                )
                .await;
                MessageStatus::Failed
            }
        }
    }

    /// Deliver an email through the gateway
    pub async fn send_email(
        &self,
        api: &dyn EmailApi,
        to: &str,
        subject: &str,
        body: &str,
        order_number: Option<&str>,
    ) -> MessageStatus {
        if !api.is_configured() {
            tracing::warn!("Email gateway not configured, dropping dispatch");
            return MessageStatus::Failed;
        }

        let html = format!("<p>{}</p>", body.replace('\n', "<br>"));
        match api.send(to, subject, &html).await {
            Ok(()) => {
                self.log(DispatchChannel::Email, to, body, MessageStatus::Sent, None, order_number)
                    .await;
                MessageStatus::Sent
            }
            Err(e) => {
                tracing::warn!(to = %to, error = %e, "Email dispatch failed");
                self.log(
                    DispatchChannel::Email,
                    to,
                    body,
                    MessageStatus::Failed,
                    Some(e.to_string()),
                    order_number,
                )
                .await;
                MessageStatus::Failed
            }
        }
    }

    /// Append the audit row; a failed append only loses the audit entry,
    /// never the dispatch outcome
    async fn log(
        &self,
        channel: DispatchChannel,
        destination: &str,
        message: &str,
        status: MessageStatus,
        error: Option<String>,
        order_number: Option<&str>,
    ) {
        let entry = MessageLogEntry {
            channel,
            destination: destination.to_string(),
            message: message.to_string(),
            status,
            error,
            order_number: order_number.map(str::to_string),
        };
        if let Err(e) = self.logs.append(entry).await {
            tracing::error!(error = %e, "Failed to write message log entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::testing::MockChannelApi;
    use crate::db::DbService;

    #[test]
    fn destination_normalization() {
        assert_eq!(
            normalize_destination("+55 (11) 99999-0000", "55"),
            Some("5511999990000".to_string())
        );
        // Bare local number gets the country code exactly once
        assert_eq!(
            normalize_destination("(11) 99999-0000", "55"),
            Some("5511999990000".to_string())
        );
        assert_eq!(
            normalize_destination("5511999990000", "55"),
            Some("5511999990000".to_string())
        );
        assert_eq!(normalize_destination("sem número", "55"), None);
        assert_eq!(normalize_destination("", "55"), None);
    }

    async fn dispatcher() -> (MessageDispatcher, MessageLogRepository) {
        let db = DbService::new_in_memory().await.unwrap().db;
        (
            MessageDispatcher::new(db.clone(), "55".to_string()),
            MessageLogRepository::new(db),
        )
    }

    #[tokio::test]
    async fn successful_text_send_is_logged() {
        let (dispatcher, logs) = dispatcher().await;
        let api = MockChannelApi::new();

        let status = dispatcher
            .send_whatsapp_text(&api, "11 99999-0000", "Olá!", Some("OS2501-0001"))
            .await;

        assert_eq!(status, MessageStatus::Sent);
        let sent = api.sent_texts.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "5511999990000");

        let rows = logs.query_recent(None, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, MessageStatus::Sent);
        assert_eq!(rows[0].order_number.as_deref(), Some("OS2501-0001"));
    }

    #[tokio::test]
    async fn provider_failure_is_logged_with_error_text() {
        let (dispatcher, logs) = dispatcher().await;
        let api = MockChannelApi::new().with_send_failure("connection refused");

        let status = dispatcher
            .send_whatsapp_text(&api, "11 99999-0000", "Olá!", None)
            .await;

        assert_eq!(status, MessageStatus::Failed);
        let rows = logs.query_recent(None, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, MessageStatus::Failed);
        assert!(rows[0].error.as_deref().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn unconfigured_channel_short_circuits_without_log() {
        let (dispatcher, logs) = dispatcher().await;
        let api = MockChannelApi::new().unconfigured();

        let status = dispatcher
            .send_whatsapp_text(&api, "11 99999-0000", "Olá!", None)
            .await;

        assert_eq!(status, MessageStatus::Failed);
        assert!(api.sent_texts.lock().unwrap().is_empty());
        // Channel never configured: no audit row
        assert!(logs.query_recent(None, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn document_send_uses_media_capability_and_marker() {
        let (dispatcher, logs) = dispatcher().await;
        let api = MockChannelApi::new();
        let document = crate::receipt::RenderedDocument {
            bytes: vec![1, 2, 3],
            base64: "AQID".to_string(),
            filename: "recibo-OS2501-0001.pdf".to_string(),
        };

        let status = dispatcher
            .send_whatsapp_document(&api, "11 99999-0000", &document, "Comprovante", None)
            .await;

        assert_eq!(status, MessageStatus::Sent);
        // Media send, not text send
        assert!(api.sent_texts.lock().unwrap().is_empty());
        let docs = api.sent_documents.lock().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].filename, "recibo-OS2501-0001.pdf");

        let rows = logs.query_recent(None, 10).await.unwrap();
        assert_eq!(rows[0].message, "[documento] recibo-OS2501-0001.pdf");
    }
}
