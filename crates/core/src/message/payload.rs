use bytes::Bytes;
use serde::Deserialize;
use serde::Serialize;

use crate::dht::NodeRef;
use crate::error::Error;
use crate::error::Result;
use crate::message::types::Message;

/// `MessagePayload` is used to transmit data between nodes.
/// A report carries the `tx_id` of the request it answers.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct MessagePayload {
    /// Correlates a report with its request.
    pub tx_id: u64,
    /// The node which created the payload.
    pub origin: NodeRef,
    /// The node the payload is sent to.
    pub destination: NodeRef,
    /// Payload data
    pub data: Message,
}

impl MessagePayload {
    /// Wrap a request.
    pub fn new_send(data: Message, origin: NodeRef, destination: NodeRef, tx_id: u64) -> Self {
        Self {
            tx_id,
            origin,
            destination,
            data,
        }
    }

    /// Wrap the report of this payload: same `tx_id`, back to the origin.
    pub fn report(&self, data: Message) -> Self {
        Self {
            tx_id: self.tx_id,
            origin: self.destination.clone(),
            destination: self.origin.clone(),
            data,
        }
    }

    /// Deserializes a `MessagePayload` instance from a byte slice.
    pub fn from_bincode(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data).map_err(Error::BincodeDeserialize)
    }

    /// Serializes the `MessagePayload` instance into binary data.
    pub fn to_bincode(&self) -> Result<Bytes> {
        bincode::serialize(self)
            .map(Bytes::from)
            .map_err(Error::BincodeSerialize)
    }
}
