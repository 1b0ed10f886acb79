//! Maintenance of successor, predecessor and fingers.
use crate::dht::Chord;
use crate::dht::NodeRef;
use crate::dht::PeerRingAction;
use crate::dht::PeerRingRemoteAction;
use crate::error::Error;
use crate::error::Result;
use crate::message::FixFingersReport;
use crate::message::FixFingersSend;
use crate::message::Message;
use crate::message::NotifyPredecessorReport;
use crate::message::NotifyPredecessorSend;
use crate::message::UpdateFingerTableReport;
use crate::message::UpdateFingerTableSend;
use crate::node::ChordNode;

impl ChordNode {
    /// Verify the successor and tell it about this node.
    pub async fn stabilize(&self) -> Result<()> {
        let successor = self.dht.successor()?;
        let info = self.remote_topo_info(&successor).await?;
        match self.dht.stabilize(info)? {
            PeerRingAction::RemoteAction(next, PeerRingRemoteAction::Notify(node)) => {
                self.remote_notify(&next, node).await?;
                Ok(())
            }
            act => Err(Error::PeerRingUnexpectedAction(format!("{:?}", act))),
        }
    }

    /// `node` thinks it might be the predecessor of this node.
    /// Returns the predecessor after updating.
    pub fn notify(&self, node: NodeRef) -> Result<NodeRef> {
        self.dht.notify(node)
    }

    /// Ask `target` to consider `node` as its predecessor.
    pub async fn remote_notify(&self, target: &NodeRef, node: NodeRef) -> Result<NodeRef> {
        if self.is_self(target) {
            return self.notify(node);
        }
        let report: NotifyPredecessorReport = self
            .transport
            .request(
                target,
                Message::NotifyPredecessorSend(NotifyPredecessorSend { node }),
            )
            .await?;
        Ok(report.node)
    }

    /// Recompute every finger with a lookup of its start.
    pub async fn fix_fingers(&self) -> Result<()> {
        let starts = self.dht.finger_starts()?;
        for (index, start) in starts.into_iter().enumerate() {
            let node = self.lookup_successor(start).await?;
            self.dht.set_finger(index, node)?;
        }
        tracing::debug!("node {} fixed fingers", self.id());
        Ok(())
    }

    /// Ask `target` to recompute all its fingers.
    /// The deadline covers one full lookup per finger on the remote side.
    pub async fn remote_fix_fingers(&self, target: &NodeRef) -> Result<()> {
        if self.is_self(target) {
            return self.fix_fingers().await;
        }
        let timeout =
            self.transport.timeout() * u32::from(self.ring().bits()) * self.lookup_calls();
        let _: FixFingersReport = self
            .transport
            .request_with_timeout(target, Message::FixFingersSend(FixFingersSend), timeout)
            .await?;
        Ok(())
    }

    /// Install `node` as finger `index` when it improves the slot, and pass the update to
    /// the predecessor while `ttl` allows. A `ttl` of 0 updates this node only.
    /// Returns whether this node changed.
    pub async fn update_finger_table(&self, node: NodeRef, index: usize, ttl: u32) -> Result<bool> {
        match self.dht.update_finger_table(node, index)? {
            PeerRingAction::None => Ok(false),
            PeerRingAction::Some(_) => Ok(true),
            PeerRingAction::RemoteAction(
                pred,
                PeerRingRemoteAction::UpdateFingerTable(node, index),
            ) => {
                if ttl == 0 {
                    tracing::debug!(
                        "node {} keeps finger {} of {} to itself, ttl spent",
                        self.id(),
                        index,
                        node
                    );
                    return Ok(true);
                }
                self.remote_update_finger_table(&pred, node, index, ttl - 1)
                    .await?;
                Ok(true)
            }
            act => Err(Error::PeerRingUnexpectedAction(format!("{:?}", act))),
        }
    }

    /// Ask `target` to run [ChordNode::update_finger_table]. `target` is another node.
    /// The deadline covers every hop the update may still be passed along.
    pub async fn remote_update_finger_table(
        &self,
        target: &NodeRef,
        node: NodeRef,
        index: usize,
        ttl: u32,
    ) -> Result<bool> {
        let timeout = self.transport.timeout() * ttl.saturating_add(1);
        let report: UpdateFingerTableReport = self
            .transport
            .request_with_timeout(
                target,
                Message::UpdateFingerTableSend(UpdateFingerTableSend {
                    node,
                    index: index as u32,
                    ttl,
                }),
                timeout,
            )
            .await?;
        Ok(report.updated)
    }
}
