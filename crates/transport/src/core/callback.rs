//! This module contains the [TransportCallback] trait.

use async_trait::async_trait;

/// Error type returned by callbacks. The transport only logs it.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// The [TransportCallback] is owned by the transport and shared by every delivery
/// towards the endpoint it was registered for.
pub type BoxedTransportCallback = Box<dyn TransportCallback + Send + Sync>;

/// Any object that implements this trait can be used as a callback for an endpoint.
#[async_trait]
pub trait TransportCallback {
    /// This method is invoked on a message arrival. `from` is the address of the sender.
    async fn on_message(&self, _from: &str, _msg: &[u8]) -> Result<(), CallbackError> {
        Ok(())
    }
}
