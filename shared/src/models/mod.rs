//! Data models
//!
//! Shared between os-server and API consumers.

pub mod notification;
pub mod order;

// Re-exports
pub use notification::*;
pub use order::*;
