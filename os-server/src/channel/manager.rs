//! Channel connection manager
//!
//! Owns the lifecycle of a tenant's channel instance:
//!
//! ```text
//! DISCONNECTED → CONNECTING → CONNECTED
//!       ↑             ↑            │
//!       └─────────────┴── logout ──┘
//! ```
//!
//! Every operation reconciles the provider-reported state into the
//! tenant's ChannelConfig row. Polling is caller-driven: this module
//! owns no timers, so an abandoned pairing attempt simply gets picked
//! up by the next `ensure_connected`/`poll_status` call.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::client::{ChannelApi, ChannelError};
use super::types::{ChannelStatus, ConnectionState};
use crate::db::models::ChannelConfig;
use crate::db::repository::ChannelConfigRepository;
use crate::utils::{AppError, AppResult};

pub struct ChannelConnectionManager {
    configs: ChannelConfigRepository,
}

impl ChannelConnectionManager {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            configs: ChannelConfigRepository::new(db),
        }
    }

    /// Idempotently drive the instance toward CONNECTED
    ///
    /// Already-open instances return immediately without touching the
    /// provider further. A missing instance is created; when creation
    /// yields a pairing code synchronously it is returned directly.
    pub async fn ensure_connected(
        &self,
        config: &ChannelConfig,
        api: &dyn ChannelApi,
    ) -> AppResult<ChannelStatus> {
        match api.connection_state().await {
            Ok(state) if state.state == ConnectionState::Connected => {
                let updated = self
                    .configs
                    .set_connection(&config.id, true, state.paired_number)
                    .await?;
                Ok(ChannelStatus {
                    state: ConnectionState::Connected,
                    phone_number: updated.phone_number,
                    pairing_code: None,
                })
            }
            Ok(state) => {
                self.configs.set_connection(&config.id, false, None).await?;
                Ok(ChannelStatus {
                    state: state.state,
                    phone_number: None,
                    pairing_code: None,
                })
            }
            Err(ChannelError::InstanceNotFound) => {
                tracing::info!(
                    instance = %config.instance_name,
                    "Channel instance missing on provider, creating"
                );
                let code = api
                    .create_instance()
                    .await
                    .map_err(|e| AppError::internal(format!("Instance creation failed: {e}")))?;
                self.configs.set_connection(&config.id, false, None).await?;
                Ok(ChannelStatus {
                    state: ConnectionState::Connecting,
                    phone_number: None,
                    pairing_code: code.map(|c| c.code),
                })
            }
            Err(e) => Err(AppError::internal(format!(
                "Provider state check failed: {e}"
            ))),
        }
    }

    /// Request a pairing code, creating the instance if the provider
    /// lost it (one transparent retry)
    pub async fn pairing_code(
        &self,
        config: &ChannelConfig,
        api: &dyn ChannelApi,
    ) -> AppResult<ChannelStatus> {
        let code = match api.pairing_code().await {
            Ok(code) => code,
            Err(ChannelError::InstanceNotFound) => {
                tracing::info!(
                    instance = %config.instance_name,
                    "Instance missing while requesting pairing code, recreating"
                );
                if let Some(code) = api
                    .create_instance()
                    .await
                    .map_err(|e| AppError::internal(format!("Instance creation failed: {e}")))?
                {
                    code
                } else {
                    api.pairing_code()
                        .await
                        .map_err(|e| AppError::internal(format!("Pairing code failed: {e}")))?
                }
            }
            Err(e) => {
                return Err(AppError::internal(format!("Pairing code failed: {e}")));
            }
        };

        self.configs.set_connection(&config.id, false, None).await?;
        Ok(ChannelStatus {
            state: ConnectionState::Connecting,
            phone_number: None,
            pairing_code: Some(code.code),
        })
    }

    /// Single status check for caller-driven polling loops
    ///
    /// The caller bounds retries (e.g. every few seconds for up to two
    /// minutes); this method just observes and persists.
    pub async fn poll_status(
        &self,
        config: &ChannelConfig,
        api: &dyn ChannelApi,
    ) -> AppResult<ChannelStatus> {
        match api.connection_state().await {
            Ok(state) => {
                let connected = state.state == ConnectionState::Connected;
                let updated = self
                    .configs
                    .set_connection(
                        &config.id,
                        connected,
                        if connected { state.paired_number } else { None },
                    )
                    .await?;
                Ok(ChannelStatus {
                    state: state.state,
                    phone_number: updated.phone_number,
                    pairing_code: None,
                })
            }
            Err(ChannelError::InstanceNotFound) => {
                self.configs.set_connection(&config.id, false, None).await?;
                Ok(ChannelStatus {
                    state: ConnectionState::Disconnected,
                    phone_number: None,
                    pairing_code: None,
                })
            }
            Err(e) => Err(AppError::internal(format!(
                "Provider state check failed: {e}"
            ))),
        }
    }

    /// Log out on the provider, then persist DISCONNECTED locally
    ///
    /// The local write happens even when the provider call fails:
    /// assuming disconnected is the safe default.
    pub async fn disconnect(
        &self,
        config: &ChannelConfig,
        api: &dyn ChannelApi,
    ) -> AppResult<ChannelStatus> {
        if let Err(e) = api.logout().await {
            tracing::warn!(
                instance = %config.instance_name,
                error = %e,
                "Provider logout failed, persisting local disconnect anyway"
            );
        }
        self.configs.set_connection(&config.id, false, None).await?;
        Ok(ChannelStatus {
            state: ConnectionState::Disconnected,
            phone_number: None,
            pairing_code: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::testing::MockChannelApi;
    use crate::db::DbService;
    use crate::db::models::ChannelConfigCreate;
    use crate::db::repository::CompanyRepository;
    use crate::db::models::CompanyCreate;

    async fn setup() -> (ChannelConnectionManager, ChannelConfigRepository, ChannelConfig) {
        let db = DbService::new_in_memory().await.unwrap().db;
        let companies = CompanyRepository::new(db.clone());
        let company = companies
            .create(CompanyCreate {
                name: "Assistência Centro".to_string(),
                document: None,
            })
            .await
            .unwrap();

        let configs = ChannelConfigRepository::new(db.clone());
        let config = configs
            .create(ChannelConfigCreate {
                company_id: company.id,
                instance_name: "centro-01".to_string(),
                api_url: "http://provider.local".to_string(),
                api_key: "secret".to_string(),
            })
            .await
            .unwrap();

        (ChannelConnectionManager::new(db), configs, config)
    }

    #[tokio::test]
    async fn ensure_connected_short_circuits_when_open() {
        let (manager, configs, config) = setup().await;
        let api = MockChannelApi::new().with_state(ConnectionState::Connected, Some("5511999990000"));

        let status = manager.ensure_connected(&config, &api).await.unwrap();

        assert_eq!(status.state, ConnectionState::Connected);
        assert_eq!(status.phone_number.as_deref(), Some("5511999990000"));
        // No creation attempted on an already-open instance
        assert_eq!(api.create_calls(), 0);

        let stored = configs.find_by_id(&config.id).await.unwrap().unwrap();
        assert!(stored.is_connected);
        assert_eq!(stored.phone_number.as_deref(), Some("5511999990000"));
    }

    #[tokio::test]
    async fn ensure_connected_creates_missing_instance() {
        let (manager, _, config) = setup().await;
        let api = MockChannelApi::new()
            .with_missing_instance()
            .with_creation_code("QR-123");

        let status = manager.ensure_connected(&config, &api).await.unwrap();

        assert_eq!(status.state, ConnectionState::Connecting);
        // Creation yielded the code synchronously: no connect call needed
        assert_eq!(status.pairing_code.as_deref(), Some("QR-123"));
        assert_eq!(api.create_calls(), 1);
        assert_eq!(api.pairing_calls(), 0);
    }

    #[tokio::test]
    async fn pairing_code_recreates_lost_instance_once() {
        let (manager, _, config) = setup().await;
        let api = MockChannelApi::new()
            .with_missing_instance()
            .with_pairing_code("QR-456");

        let status = manager.pairing_code(&config, &api).await.unwrap();

        assert_eq!(status.pairing_code.as_deref(), Some("QR-456"));
        assert_eq!(api.create_calls(), 1);
        // First attempt hit InstanceNotFound, second succeeded
        assert_eq!(api.pairing_calls(), 2);
    }

    #[tokio::test]
    async fn disconnect_persists_even_when_provider_fails() {
        let (manager, configs, config) = setup().await;
        configs
            .set_connection(&config.id, true, Some("5511999990000".to_string()))
            .await
            .unwrap();

        let api = MockChannelApi::new().with_logout_failure();
        let status = manager.disconnect(&config, &api).await.unwrap();

        assert_eq!(status.state, ConnectionState::Disconnected);
        let stored = configs.find_by_id(&config.id).await.unwrap().unwrap();
        assert!(!stored.is_connected);
        assert!(stored.phone_number.is_none());
    }
}
