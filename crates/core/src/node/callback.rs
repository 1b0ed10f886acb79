use std::sync::Weak;

use async_trait::async_trait;
use chord_transport::core::callback::CallbackError;
use chord_transport::core::callback::TransportCallback;

use crate::message::MessagePayload;
use crate::node::ChordNode;

/// [InnerNodeCallback] is registered on the transport for the address of one node and
/// dispatches every incoming payload to that node.
///
/// It holds a weak reference, the transport must not keep the node alive.
pub struct InnerNodeCallback {
    node: Weak<ChordNode>,
}

impl InnerNodeCallback {
    /// Create a new [InnerNodeCallback] for the node.
    pub fn new(node: Weak<ChordNode>) -> Self {
        Self { node }
    }
}

#[async_trait]
impl TransportCallback for InnerNodeCallback {
    async fn on_message(&self, from: &str, msg: &[u8]) -> Result<(), CallbackError> {
        let Some(node) = self.node.upgrade() else {
            tracing::warn!("drop message from {}, node is gone", from);
            return Ok(());
        };
        let payload = MessagePayload::from_bincode(msg)?;
        tracing::debug!(
            "node {} received {} from {}, tx {}",
            node.id(),
            payload.data.name(),
            payload.origin,
            payload.tx_id
        );
        node.handle_payload(&payload).await.map_err(|e| {
            tracing::error!(
                "node {} failed to handle {}: {}",
                node.id(),
                payload.data.name(),
                e
            );
            e.into()
        })
    }
}
