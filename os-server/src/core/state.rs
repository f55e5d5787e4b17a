//! Server state - shared handles for all request handlers
//!
//! `ServerState` is cheap to clone (Arc-backed handles) and is the only
//! thing axum handlers receive. Repositories and domain services are
//! constructed per request from the database handle.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::mpsc;

use crate::channel::{ChannelApiFactory, ChannelConnectionManager, HttpChannelFactory};
use crate::core::Config;
use crate::db::DbService;
use crate::notify::{NotificationJob, NotificationService};
use crate::orders::OrderStateMachine;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct ServerState {
    /// Server configuration (immutable)
    pub config: Config,
    /// Embedded database handle
    pub db: Surreal<Db>,
    /// Notification outbox sender
    pub notifier: NotificationService,
    /// Per-tenant channel client factory
    pub channel_factory: Arc<dyn ChannelApiFactory>,
    /// Server instance epoch - unique id generated on startup, used to
    /// correlate log lines across restarts
    pub epoch: String,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// Initialize state: working directories, database, outbox
    ///
    /// Returns the state plus the outbox receiver the notification
    /// worker will consume.
    pub async fn initialize(config: &Config) -> AppResult<(Self, mpsc::Receiver<NotificationJob>)> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("conserta.db");
        let db = DbService::new(&db_path.to_string_lossy()).await?.db;

        let (notifier, notify_rx) = NotificationService::new(config.notify_buffer_size);

        let epoch = uuid::Uuid::new_v4().to_string();
        tracing::info!(epoch = %epoch, "Server state initialized");

        let state = Self {
            config: config.clone(),
            db,
            notifier,
            channel_factory: Arc::new(HttpChannelFactory::new()),
            epoch,
        };
        Ok((state, notify_rx))
    }

    /// Order state machine bound to this state's database and outbox
    pub fn order_machine(&self) -> OrderStateMachine {
        OrderStateMachine::new(self.db.clone(), self.notifier.clone(), self.config.timezone)
    }

    /// Channel connection manager bound to this state's database
    pub fn channel_manager(&self) -> ChannelConnectionManager {
        ChannelConnectionManager::new(self.db.clone())
    }
}
