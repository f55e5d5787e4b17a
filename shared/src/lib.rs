//! Shared types for the Conserta OS platform
//!
//! Domain types used across server crates: order status lifecycle,
//! notification channel enums, transition DTOs and time helpers.

pub mod models;
pub mod util;

// Re-exports
pub use models::notification::{DispatchChannel, MessageStatus};
pub use models::order::{OrderStatus, TransitionRequest};
