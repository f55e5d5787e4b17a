//! Conserta OS Server - multi-tenant service-order backend
//!
//! # Architecture overview
//!
//! - **Orders** (`orders`): status lifecycle state machine, the only
//!   writer of order status and derived timestamps
//! - **Notifications** (`notify`): policy → outbox → worker pipeline
//!   dispatching WhatsApp/email messages, audit-logged per attempt
//! - **Channel** (`channel`): per-tenant messaging-channel instance
//!   lifecycle (create, pair, poll, disconnect)
//! - **Receipts** (`receipt`): deterministic PDF receipt rendering
//! - **Database** (`db`): embedded SurrealDB repositories
//! - **HTTP API** (`api`): RESTful interface
//!
//! # Module structure
//!
//! ```text
//! os-server/src/
//! ├── core/          # config, state, server lifecycle
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # models and repositories
//! ├── orders/        # order state machine
//! ├── notify/        # notification policy, templates, outbox worker
//! ├── channel/       # provider client and connection manager
//! ├── receipt/       # PDF receipt renderer
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod channel;
pub mod core;
pub mod db;
pub mod money;
pub mod notify;
pub mod orders;
pub mod receipt;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use orders::OrderStateMachine;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   ______                          __
  / ____/___  ____  ________  _____/ /_____ _
 / /   / __ \/ __ \/ ___/ _ \/ ___/ __/ __ `/
/ /___/ /_/ / / / (__  )  __/ /  / /_/ /_/ /
\____/\____/_/ /_/____/\___/_/   \__/\__,_/
                 OS Server
    "#
    );
}
