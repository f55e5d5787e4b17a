//! Email channel
//!
//! Abstract [`EmailApi`] contract plus an HTTP transactional-gateway
//! implementation. Email is deployment-wide (one gateway credential for
//! the whole server), unlike the per-tenant WhatsApp channel.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::Config;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email gateway not configured")]
    NotConfigured,

    #[error("Email request failed: {0}")]
    Request(String),

    #[error("Email gateway returned {status}: {body}")]
    Gateway { status: u16, body: String },
}

/// Abstract email sender
#[async_trait]
pub trait EmailApi: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), EmailError>;
}

/// HTTP transactional email gateway client
pub struct HttpEmailClient {
    http: reqwest::Client,
    api_url: Option<String>,
    api_key: Option<String>,
    from: String,
}

impl HttpEmailClient {
    pub fn from_config(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.email_api_url.clone(),
            api_key: config.email_api_key.clone(),
            from: config.email_from.clone(),
        }
    }
}

#[async_trait]
impl EmailApi for HttpEmailClient {
    fn is_configured(&self) -> bool {
        self.api_url.is_some() && self.api_key.is_some()
    }

    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), EmailError> {
        let (Some(url), Some(key)) = (&self.api_url, &self.api_key) else {
            return Err(EmailError::NotConfigured);
        };

        let resp = self
            .http
            .post(url)
            .bearer_auth(key)
            .json(&serde_json::json!({
                "from": self.from,
                "to": to,
                "subject": subject,
                "html": html,
            }))
            .send()
            .await
            .map_err(|e| EmailError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(EmailError::Gateway { status, body });
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub struct SentEmail {
        pub to: String,
        pub subject: String,
        pub html: String,
    }

    /// Capturing mock email gateway
    pub struct MockEmailApi {
        configured: bool,
        failure: Option<String>,
        pub sent: Mutex<Vec<SentEmail>>,
    }

    impl MockEmailApi {
        pub fn new() -> Self {
            Self {
                configured: true,
                failure: None,
                sent: Mutex::new(Vec::new()),
            }
        }

        pub fn unconfigured(mut self) -> Self {
            self.configured = false;
            self
        }

        pub fn with_failure(mut self, error: &str) -> Self {
            self.failure = Some(error.to_string());
            self
        }
    }

    #[async_trait]
    impl EmailApi for MockEmailApi {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), EmailError> {
            if let Some(error) = &self.failure {
                return Err(EmailError::Gateway {
                    status: 500,
                    body: error.clone(),
                });
            }
            self.sent.lock().unwrap().push(SentEmail {
                to: to.to_string(),
                subject: subject.to_string(),
                html: html.to_string(),
            });
            Ok(())
        }
    }
}
