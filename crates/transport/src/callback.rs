//! This module contains the [InnerTransportCallback] struct.

use bytes::Bytes;

use crate::core::callback::BoxedTransportCallback;
use crate::core::transport::TransportMessage;

/// [InnerTransportCallback] wraps the [BoxedTransportCallback] with inner handling for a specific endpoint.
pub struct InnerTransportCallback {
    /// The address of the endpoint to which the current callback is assigned.
    pub address: String,
    callback: BoxedTransportCallback,
}

impl InnerTransportCallback {
    /// Create a new [InnerTransportCallback].
    pub fn new(address: &str, callback: BoxedTransportCallback) -> Self {
        Self {
            address: address.to_string(),
            callback,
        }
    }

    /// This method is invoked on a binary message arrival at the endpoint.
    pub async fn on_message(&self, from: &str, msg: &Bytes) {
        match bincode::deserialize(msg) {
            Ok(m) => self.handle_message(from, &m).await,
            Err(e) => {
                tracing::error!("Deserialize TransportMessage failed: {e:?}");
            }
        };
    }

    async fn handle_message(&self, from: &str, msg: &TransportMessage) {
        match msg {
            TransportMessage::Custom(bytes) => {
                if let Err(e) = self.callback.on_message(from, bytes).await {
                    tracing::error!(
                        "Callback on_message of {} failed: {e:?}",
                        self.address
                    )
                }
            }
        }
    }
}
