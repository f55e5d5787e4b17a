//! Mock channel provider for tests
//!
//! Captures every outbound call and lets tests script provider
//! behavior (missing instance, scripted codes, send failures).

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::client::{ChannelApi, ChannelError};
use super::types::{ConnectionState, InstanceState, PairingCode};

#[derive(Debug, Clone, PartialEq)]
pub struct SentText {
    pub to: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentDocument {
    pub to: String,
    pub filename: String,
    pub caption: Option<String>,
}

pub struct MockChannelApi {
    configured: bool,
    instance_exists: AtomicBool,
    state: ConnectionState,
    paired_number: Option<String>,
    creation_code: Option<String>,
    pairing_code: Option<String>,
    send_failure: Option<String>,
    logout_fails: bool,
    create_calls: AtomicUsize,
    pairing_calls: AtomicUsize,
    pub sent_texts: Mutex<Vec<SentText>>,
    pub sent_documents: Mutex<Vec<SentDocument>>,
}

impl MockChannelApi {
    pub fn new() -> Self {
        Self {
            configured: true,
            instance_exists: AtomicBool::new(true),
            state: ConnectionState::Disconnected,
            paired_number: None,
            creation_code: None,
            pairing_code: None,
            send_failure: None,
            logout_fails: false,
            create_calls: AtomicUsize::new(0),
            pairing_calls: AtomicUsize::new(0),
            sent_texts: Mutex::new(Vec::new()),
            sent_documents: Mutex::new(Vec::new()),
        }
    }

    pub fn with_state(mut self, state: ConnectionState, paired: Option<&str>) -> Self {
        self.state = state;
        self.paired_number = paired.map(str::to_string);
        self
    }

    pub fn with_missing_instance(self) -> Self {
        self.instance_exists.store(false, Ordering::SeqCst);
        self
    }

    pub fn with_creation_code(mut self, code: &str) -> Self {
        self.creation_code = Some(code.to_string());
        self
    }

    pub fn with_pairing_code(mut self, code: &str) -> Self {
        self.pairing_code = Some(code.to_string());
        self
    }

    pub fn with_send_failure(mut self, error: &str) -> Self {
        self.send_failure = Some(error.to_string());
        self
    }

    pub fn with_logout_failure(mut self) -> Self {
        self.logout_fails = true;
        self
    }

    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn pairing_calls(&self) -> usize {
        self.pairing_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockChannelApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelApi for MockChannelApi {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn create_instance(&self) -> Result<Option<PairingCode>, ChannelError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.instance_exists.store(true, Ordering::SeqCst);
        Ok(self
            .creation_code
            .clone()
            .map(|code| PairingCode { code }))
    }

    async fn pairing_code(&self) -> Result<PairingCode, ChannelError> {
        self.pairing_calls.fetch_add(1, Ordering::SeqCst);
        if !self.instance_exists.load(Ordering::SeqCst) {
            return Err(ChannelError::InstanceNotFound);
        }
        Ok(PairingCode {
            code: self
                .pairing_code
                .clone()
                .unwrap_or_else(|| "QR-TEST".to_string()),
        })
    }

    async fn connection_state(&self) -> Result<InstanceState, ChannelError> {
        if !self.instance_exists.load(Ordering::SeqCst) {
            return Err(ChannelError::InstanceNotFound);
        }
        Ok(InstanceState {
            state: self.state,
            paired_number: self.paired_number.clone(),
        })
    }

    async fn send_text(&self, to: &str, text: &str) -> Result<(), ChannelError> {
        if let Some(error) = &self.send_failure {
            return Err(ChannelError::Provider {
                status: 500,
                body: error.clone(),
            });
        }
        self.sent_texts.lock().unwrap().push(SentText {
            to: to.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_document(
        &self,
        to: &str,
        _base64: &str,
        filename: &str,
        caption: Option<&str>,
    ) -> Result<(), ChannelError> {
        if let Some(error) = &self.send_failure {
            return Err(ChannelError::Provider {
                status: 500,
                body: error.clone(),
            });
        }
        self.sent_documents.lock().unwrap().push(SentDocument {
            to: to.to_string(),
            filename: filename.to_string(),
            caption: caption.map(str::to_string),
        });
        Ok(())
    }

    async fn logout(&self) -> Result<(), ChannelError> {
        if self.logout_fails {
            return Err(ChannelError::Provider {
                status: 500,
                body: "logout failed".to_string(),
            });
        }
        Ok(())
    }
}
