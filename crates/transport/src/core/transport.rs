//! This module contains the [TransportInterface] trait and the envelope sent over it.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use serde::Serialize;

use crate::core::callback::BoxedTransportCallback;

/// The envelope of every message delivered by a transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TransportMessage {
    /// Opaque bytes produced by the layer above.
    Custom(Bytes),
}

/// Implemented by every message substrate.
///
/// Delivery is fire-and-forget and at-most-once: `send_message` returns as soon as the
/// message is handed over, and no ordering is guaranteed between distinct messages.
#[async_trait]
pub trait TransportInterface {
    /// Error type of the transport.
    type Error: std::error::Error;

    /// Register a callback that receives every message sent to `address`.
    fn register(&self, address: &str, callback: BoxedTransportCallback)
        -> Result<(), Self::Error>;

    /// Establish a bidirectional link between two registered addresses.
    fn connect(&self, local: &str, remote: &str) -> Result<(), Self::Error>;

    /// Check if a link exists from `local` to `remote`.
    fn is_connected(&self, local: &str, remote: &str) -> bool;

    /// List the addresses linked with `local`.
    fn connection_ids(&self, local: &str) -> Vec<String>;

    /// Send a message from `from` to `to` over an established link.
    async fn send_message(
        &self,
        from: &str,
        to: &str,
        msg: TransportMessage,
    ) -> Result<(), Self::Error>;
}
