#![warn(missing_docs)]
//! This module implemented message handler of chord nodes.
//! Every request is answered with its report, reports are handed to the waiting caller.

use async_trait::async_trait;

use super::MessagePayload;
use crate::error::Result;
use crate::message::types::Message;
use crate::node::ChordNode;

/// Operator and handler for lookups
pub mod dht;
/// Operator and handler for DHT stabilization
pub mod stabilization;
/// Operator and Handler for Storage
pub mod storage;

/// Generic trait for handle message, inspired by Actor-Model.
#[async_trait]
pub trait HandleMsg<T> {
    /// Message handler.
    async fn handle(&self, ctx: &MessagePayload, msg: &T) -> Result<()>;
}

impl ChordNode {
    /// Dispatch an incoming payload to its handler.
    pub async fn handle_payload(&self, payload: &MessagePayload) -> Result<()> {
        match &payload.data {
            Message::FindSuccessorSend(msg) => self.handle(payload, msg).await,
            Message::FindPredecessorSend(msg) => self.handle(payload, msg).await,
            Message::FindClosestPrecedingFingerSend(msg) => self.handle(payload, msg).await,
            Message::QueryForTopoInfoSend(msg) => self.handle(payload, msg).await,
            Message::NotifyPredecessorSend(msg) => self.handle(payload, msg).await,
            Message::UpdateFingerTableSend(msg) => self.handle(payload, msg).await,
            Message::FixFingersSend(msg) => self.handle(payload, msg).await,
            Message::StoreKeySend(msg) => self.handle(payload, msg).await,
            Message::SearchKeySend(msg) => self.handle(payload, msg).await,
            report => {
                debug_assert!(report.is_report());
                self.transport.resolve(payload.clone());
                Ok(())
            }
        }
    }
}
