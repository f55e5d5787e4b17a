//! Notification pipeline
//!
//! Transition → policy → intents → (template, document) → dispatch,
//! decoupled from the request path by an in-memory outbox:
//!
//! ```text
//! OrderStateMachine ──enqueue──▶ mpsc ──▶ NotificationWorker
//!                                             ├─ policy::decide
//!                                             ├─ idempotency claim (CAS)
//!                                             ├─ template::render
//!                                             ├─ ReceiptRenderer (PAID)
//!                                             └─ MessageDispatcher → MessageLog
//! ```

pub mod context;
pub mod dispatcher;
pub mod email;
pub mod policy;
pub mod service;
pub mod template;
pub mod worker;

pub use context::{OrderContext, ServiceLine};
pub use dispatcher::MessageDispatcher;
pub use policy::{DispatchIntent, IdempotencyKey};
pub use service::{NotificationJob, NotificationService};
pub use worker::NotificationWorker;
