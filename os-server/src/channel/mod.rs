//! Messaging channel integration
//!
//! Everything that talks to the external WhatsApp channel provider:
//! the abstract [`ChannelApi`] contract, its HTTP implementation
//! (constructed per tenant from the tenant's ChannelConfig) and the
//! connection lifecycle manager.

pub mod client;
pub mod manager;
pub mod types;

pub use client::{ChannelApi, ChannelApiFactory, ChannelError, HttpChannelClient, HttpChannelFactory};
pub use manager::ChannelConnectionManager;
pub use types::{ChannelStatus, ConnectionState, InstanceState, PairingCode};

#[cfg(test)]
pub mod testing;
