//! Lookups, each in a local variant over the state of this node and a remote variant
//! asking another node through a request.
use crate::dht::Chord;
use crate::dht::Identifier;
use crate::dht::NodeRef;
use crate::dht::PeerRingAction;
use crate::dht::PeerRingRemoteAction;
use crate::dht::TopoInfo;
use crate::error::Error;
use crate::error::Result;
use crate::measure::MeasureCounter;
use crate::message::FindClosestPrecedingFingerReport;
use crate::message::FindClosestPrecedingFingerSend;
use crate::message::FindPredecessorReport;
use crate::message::FindPredecessorSend;
use crate::message::FindSuccessorReport;
use crate::message::FindSuccessorSend;
use crate::message::Message;
use crate::message::QueryForTopoInfoReport;
use crate::message::QueryForTopoInfoSend;
use crate::node::ChordNode;

impl ChordNode {
    /// Find the node responsible for `id`, walking the ring from this node.
    pub async fn find_successor(&self, id: Identifier) -> Result<NodeRef> {
        self.ensure_joined()?;
        self.lookup_successor(id).await
    }

    /// Find the node whose arc `(node, node.successor]` holds `id`.
    pub async fn find_predecessor(&self, id: Identifier) -> Result<NodeRef> {
        self.ensure_joined()?;
        self.lookup_predecessor(id).await
    }

    /// [ChordNode::find_successor] over whatever routing state this node has, also
    /// while it is joining.
    pub(crate) async fn lookup_successor(&self, id: Identifier) -> Result<NodeRef> {
        self.measure.incr(MeasureCounter::FindSuccessor);
        match self.dht.find_successor(id)? {
            PeerRingAction::Some(node) => Ok(node),
            PeerRingAction::RemoteAction(next, PeerRingRemoteAction::FindSuccessor(id)) => {
                self.walk(next, id).await.map(|(_, successor)| successor)
            }
            act => Err(Error::PeerRingUnexpectedAction(format!("{:?}", act))),
        }
    }

    pub(crate) async fn lookup_predecessor(&self, id: Identifier) -> Result<NodeRef> {
        self.measure.incr(MeasureCounter::FindPredecessor);
        match self.dht.find_predecessor(id)? {
            PeerRingAction::Some(node) => Ok(node),
            PeerRingAction::RemoteAction(next, PeerRingRemoteAction::FindPredecessor(id)) => {
                self.walk(next, id).await.map(|(predecessor, _)| predecessor)
            }
            act => Err(Error::PeerRingUnexpectedAction(format!("{:?}", act))),
        }
    }

    /// The finger of this node closest before `id`, or this node.
    pub fn closest_preceding_finger(&self, id: Identifier) -> Result<NodeRef> {
        self.measure.incr(MeasureCounter::ClosestPrecedingFinger);
        self.dht.closest_preceding_finger(id)
    }

    /// Ask `target` for the successor of `id`.
    /// The deadline covers the whole walk `target` runs.
    pub async fn remote_find_successor(&self, target: &NodeRef, id: Identifier) -> Result<NodeRef> {
        if self.is_self(target) {
            return self.find_successor(id).await;
        }
        let report: FindSuccessorReport = self
            .transport
            .request_with_timeout(
                target,
                Message::FindSuccessorSend(FindSuccessorSend { id }),
                self.transport.timeout() * self.lookup_calls(),
            )
            .await?;
        Ok(report.node)
    }

    /// Ask `target` for the predecessor of `id`.
    pub async fn remote_find_predecessor(
        &self,
        target: &NodeRef,
        id: Identifier,
    ) -> Result<NodeRef> {
        if self.is_self(target) {
            return self.find_predecessor(id).await;
        }
        let report: FindPredecessorReport = self
            .transport
            .request_with_timeout(
                target,
                Message::FindPredecessorSend(FindPredecessorSend { id }),
                self.transport.timeout() * self.lookup_calls(),
            )
            .await?;
        Ok(report.node)
    }

    /// Ask `target` for its closest preceding finger of `id`.
    pub async fn remote_closest_preceding_finger(
        &self,
        target: &NodeRef,
        id: Identifier,
    ) -> Result<NodeRef> {
        if self.is_self(target) {
            return self.closest_preceding_finger(id);
        }
        self.measure.incr(MeasureCounter::ClosestPrecedingFinger);
        let report: FindClosestPrecedingFingerReport = self
            .transport
            .request(
                target,
                Message::FindClosestPrecedingFingerSend(FindClosestPrecedingFingerSend { id }),
            )
            .await?;
        Ok(report.node)
    }

    /// Successor and predecessor of `target`.
    pub async fn remote_topo_info(&self, target: &NodeRef) -> Result<TopoInfo> {
        if self.is_self(target) {
            return self.dht.topo_info();
        }
        let report: QueryForTopoInfoReport = self
            .transport
            .request(
                target,
                Message::QueryForTopoInfoSend(QueryForTopoInfoSend),
            )
            .await?;
        Ok(report.info)
    }

    /// Walk from `current` until `id` lies in `(current, current.successor]`.
    /// Returns that node and its successor. Every request of the walk is answered by
    /// its target alone.
    pub(crate) async fn walk(&self, mut current: NodeRef, id: Identifier) -> Result<(NodeRef, NodeRef)> {
        let ring = self.ring();
        for _ in 0..self.hop_limit() {
            let successor = self.remote_topo_info(&current).await?.successor;
            if ring.between(id, current.id, successor.id, false, true) {
                return Ok((current, successor));
            }
            let next = self.remote_closest_preceding_finger(&current, id).await?;
            if next == current {
                tracing::warn!(
                    "lookup of {} makes no progress at {}, stop walking",
                    id,
                    current
                );
                return Ok((current, successor));
            }
            tracing::debug!("lookup of {} hops from {} to {}", id, current, next);
            current = next;
        }
        Err(Error::LookupHopLimit(id.value()))
    }
}
