//! Server Implementation
//!
//! HTTP server startup, background worker lifecycle and graceful
//! shutdown. The notification worker is cancelled after the listener
//! stops and gets a bounded window to drain pending jobs.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::core::ServerState;
use crate::notify::email::{EmailApi, HttpEmailClient};
use crate::notify::{NotificationJob, NotificationWorker};

/// HTTP Server
pub struct Server {
    state: ServerState,
    notify_rx: mpsc::Receiver<NotificationJob>,
}

impl Server {
    pub fn new(state: ServerState, notify_rx: mpsc::Receiver<NotificationJob>) -> Self {
        Self { state, notify_rx }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let shutdown = CancellationToken::new();

        // Notification worker consumes the outbox until shutdown
        let email: Arc<dyn EmailApi> = Arc::new(HttpEmailClient::from_config(&self.state.config));
        let worker = NotificationWorker::new(
            self.state.db.clone(),
            self.state.config.default_country_code.clone(),
            self.state.config.timezone,
            email,
            self.state.channel_factory.clone(),
        );
        let worker_handle = tokio::spawn(worker.run(self.notify_rx, shutdown.clone()));

        let app = api::router()
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            )
            .with_state(self.state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.http_port));
        tracing::info!("🛠️  Conserta OS Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let signal_token = shutdown.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
                signal_token.cancel();
            })
            .await?;

        // Give the worker a bounded window to drain pending notifications
        shutdown.cancel();
        let timeout = Duration::from_millis(self.state.config.shutdown_timeout_ms);
        if tokio::time::timeout(timeout, worker_handle).await.is_err() {
            tracing::warn!(
                "Notification worker did not drain within {}ms",
                self.state.config.shutdown_timeout_ms
            );
        }

        Ok(())
    }
}
