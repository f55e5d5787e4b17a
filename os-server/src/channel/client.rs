//! Channel provider client
//!
//! [`ChannelApi`] is the abstract contract the rest of the system
//! programs against; [`HttpChannelClient`] implements it over the
//! provider's REST API. A client is built per tenant from that tenant's
//! ChannelConfig; there is no process-wide provider configuration.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

use super::types::{ConnectionState, InstanceState, PairingCode};
use crate::db::models::ChannelConfig;

/// Channel provider errors
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The instance name is unknown on the provider side
    #[error("Channel instance not found on provider")]
    InstanceNotFound,

    #[error("Provider request failed: {0}")]
    Request(String),

    #[error("Provider returned {status}: {body}")]
    Provider { status: u16, body: String },
}

/// Abstract messaging-channel provider
///
/// All calls are scoped to one tenant's instance and credential.
#[async_trait]
pub trait ChannelApi: Send + Sync {
    /// Whether this client carries usable credentials
    fn is_configured(&self) -> bool;

    /// Create the instance; may yield a pairing code synchronously
    async fn create_instance(&self) -> Result<Option<PairingCode>, ChannelError>;

    /// Request a scannable pairing code for an existing instance
    async fn pairing_code(&self) -> Result<PairingCode, ChannelError>;

    /// Query the current connection state
    async fn connection_state(&self) -> Result<InstanceState, ChannelError>;

    /// Send a plain text message
    async fn send_text(&self, to: &str, text: &str) -> Result<(), ChannelError>;

    /// Send a base64 document (mutually exclusive with text send)
    async fn send_document(
        &self,
        to: &str,
        base64: &str,
        filename: &str,
        caption: Option<&str>,
    ) -> Result<(), ChannelError>;

    /// Log the instance out of its paired account
    async fn logout(&self) -> Result<(), ChannelError>;
}

/// Builds per-tenant [`ChannelApi`] values
///
/// The indirection keeps the worker and handlers testable with mock
/// providers.
pub trait ChannelApiFactory: Send + Sync {
    fn for_config(&self, config: &ChannelConfig) -> Arc<dyn ChannelApi>;
}

/// Factory producing [`HttpChannelClient`]s sharing one reqwest pool
pub struct HttpChannelFactory {
    http: reqwest::Client,
}

impl HttpChannelFactory {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for HttpChannelFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelApiFactory for HttpChannelFactory {
    fn for_config(&self, config: &ChannelConfig) -> Arc<dyn ChannelApi> {
        Arc::new(HttpChannelClient::new(self.http.clone(), config))
    }
}

// ── Provider wire types ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CreateInstanceResponse {
    #[serde(default)]
    qrcode: Option<WireQrCode>,
}

#[derive(Debug, Deserialize)]
struct WireQrCode {
    #[serde(default)]
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PairingResponse {
    #[serde(default)]
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StateResponse {
    #[serde(default)]
    instance: Option<WireInstanceState>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireInstanceState {
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    owner_jid: Option<String>,
}

/// HTTP implementation of [`ChannelApi`]
///
/// Authenticates every call with the tenant's `apikey` header and
/// addresses the tenant's instance by name.
pub struct HttpChannelClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    instance: String,
}

impl HttpChannelClient {
    pub fn new(http: reqwest::Client, config: &ChannelConfig) -> Self {
        Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            instance: config.instance_name.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Map a provider response to our error taxonomy
    ///
    /// 404 means the instance does not exist on the provider, which the
    /// connection manager handles by creating it.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ChannelError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ChannelError::InstanceNotFound);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ChannelError::Provider {
            status: status.as_u16(),
            body,
        })
    }

    fn map_state(raw: Option<&str>) -> ConnectionState {
        match raw {
            Some("open") => ConnectionState::Connected,
            Some("connecting") => ConnectionState::Connecting,
            _ => ConnectionState::Disconnected,
        }
    }
}

#[async_trait]
impl ChannelApi for HttpChannelClient {
    fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.base_url.trim().is_empty()
    }

    async fn create_instance(&self) -> Result<Option<PairingCode>, ChannelError> {
        let resp = self
            .http
            .post(self.url("instance/create"))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({
                "instanceName": self.instance,
                "qrcode": true,
            }))
            .send()
            .await
            .map_err(|e| ChannelError::Request(e.to_string()))?;
        let resp = Self::check(resp).await?;

        let data: CreateInstanceResponse = resp
            .json()
            .await
            .map_err(|e| ChannelError::Request(format!("Invalid create response: {e}")))?;
        Ok(data
            .qrcode
            .and_then(|q| q.code)
            .map(|code| PairingCode { code }))
    }

    async fn pairing_code(&self) -> Result<PairingCode, ChannelError> {
        let resp = self
            .http
            .get(self.url(&format!("instance/connect/{}", self.instance)))
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| ChannelError::Request(e.to_string()))?;
        let resp = Self::check(resp).await?;

        let data: PairingResponse = resp
            .json()
            .await
            .map_err(|e| ChannelError::Request(format!("Invalid pairing response: {e}")))?;
        data.code
            .map(|code| PairingCode { code })
            .ok_or_else(|| ChannelError::Request("Provider returned no pairing code".to_string()))
    }

    async fn connection_state(&self) -> Result<InstanceState, ChannelError> {
        let resp = self
            .http
            .get(self.url(&format!("instance/connectionState/{}", self.instance)))
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| ChannelError::Request(e.to_string()))?;
        let resp = Self::check(resp).await?;

        let data: StateResponse = resp
            .json()
            .await
            .map_err(|e| ChannelError::Request(format!("Invalid state response: {e}")))?;
        let instance = data.instance.unwrap_or(WireInstanceState {
            state: None,
            owner_jid: None,
        });
        Ok(InstanceState {
            state: Self::map_state(instance.state.as_deref()),
            // ownerJid comes as "5511999990000@s.whatsapp.net"
            paired_number: instance
                .owner_jid
                .map(|jid| jid.split('@').next().unwrap_or(&jid).to_string()),
        })
    }

    async fn send_text(&self, to: &str, text: &str) -> Result<(), ChannelError> {
        let resp = self
            .http
            .post(self.url(&format!("message/sendText/{}", self.instance)))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({
                "number": to,
                "text": text,
            }))
            .send()
            .await
            .map_err(|e| ChannelError::Request(e.to_string()))?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn send_document(
        &self,
        to: &str,
        base64: &str,
        filename: &str,
        caption: Option<&str>,
    ) -> Result<(), ChannelError> {
        let resp = self
            .http
            .post(self.url(&format!("message/sendMedia/{}", self.instance)))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({
                "number": to,
                "mediatype": "document",
                "media": base64,
                "fileName": filename,
                "caption": caption,
            }))
            .send()
            .await
            .map_err(|e| ChannelError::Request(e.to_string()))?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn logout(&self) -> Result<(), ChannelError> {
        let resp = self
            .http
            .delete(self.url(&format!("instance/logout/{}", self.instance)))
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| ChannelError::Request(e.to_string()))?;
        Self::check(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_mapping() {
        assert_eq!(
            HttpChannelClient::map_state(Some("open")),
            ConnectionState::Connected
        );
        assert_eq!(
            HttpChannelClient::map_state(Some("connecting")),
            ConnectionState::Connecting
        );
        assert_eq!(
            HttpChannelClient::map_state(Some("close")),
            ConnectionState::Disconnected
        );
        assert_eq!(
            HttpChannelClient::map_state(None),
            ConnectionState::Disconnected
        );
    }
}
