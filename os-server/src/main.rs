use os_server::{Config, Server, ServerState, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, logging)
    dotenv::dotenv().ok();
    os_server::init_logger();

    print_banner();
    tracing::info!("🛠️  Conserta OS Server starting...");

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize state (work dir, database, outbox)
    let (state, notify_rx) = ServerState::initialize(&config).await?;

    // 4. Run the HTTP server (spawns the notification worker)
    let server = Server::new(state, notify_rx);
    server.run().await
}
