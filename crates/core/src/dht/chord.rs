//! Chord algorithm implement.
#![warn(missing_docs)]
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use super::finger::FingerTable;
use super::ring::Identifier;
use super::ring::Ring;
use super::types::Chord;
use super::types::NodeRef;
use super::types::TopoInfo;
use crate::error::Error;
use crate::error::Result;
use crate::storage::KvStorageInterface;
use crate::storage::MemStorage;

/// `KeyStorage` is the type accepted by `PeerRing::new_with_storage`.
/// It holds the keys this node is responsible for, each key stored under itself.
pub type KeyStorage = Box<dyn KvStorageInterface<Identifier, Identifier> + Send + Sync>;

/// PeerRing is the local routing state of one node on the ring.
/// All nodes form a clockwise ring in the order of [Identifier].
/// PeerRing implemented the local half of the [Chord] algorithm, the remote half
/// is driven by [ChordNode](crate::node::ChordNode) following the returned actions.
pub struct PeerRing {
    /// The handle of current node.
    pub node: NodeRef,
    /// The identifier space.
    pub ring: Ring,
    /// [FingerTable] help node to find successor quickly.
    /// `finger[0]` is the next node on the ring.
    pub finger: Arc<Mutex<FingerTable>>,
    /// The previous node on the ring.
    pub predecessor: Arc<Mutex<Option<NodeRef>>>,
    /// Keys stored on this node.
    pub storage: KeyStorage,
}

/// Type alias is just for making the code easy to read.
type Target = NodeRef;

/// `PeerRing` use this to describe the result of [Chord] algorithm. Sometimes it's a
/// direct result, sometimes it's an action that is continued externally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PeerRingAction {
    /// No result, the whole manipulation is done internally.
    None,
    /// Found some node.
    Some(NodeRef),
    /// Trigger a remote action.
    RemoteAction(Target, RemoteAction),
}

/// Some of the process needs to be done remotely. This enum is used to describe that.
///
/// In the following comments, `node_a` is the target declared in [PeerRingAction].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteAction {
    /// Continue walking from `node_a` to the predecessor of the id.
    FindPredecessor(Identifier),
    /// Continue walking from `node_a` to the successor of the id.
    FindSuccessor(Identifier),
    /// Let `node_a` [notify](Chord::notify) the node.
    Notify(NodeRef),
    /// Let `node_a` install the node at the finger index if it improves the slot.
    UpdateFingerTable(NodeRef, usize),
}

impl TryFrom<&PeerRing> for TopoInfo {
    type Error = Error;
    fn try_from(dht: &PeerRing) -> Result<TopoInfo> {
        let successor = dht.successor()?;
        let predecessor = dht.lock_predecessor()?.clone();
        Ok(TopoInfo {
            successor,
            predecessor,
        })
    }
}

impl PeerRing {
    /// Create a new unjoined PeerRing with in-memory key storage.
    pub fn new(node: NodeRef, ring: Ring) -> Self {
        Self::new_with_storage(
            node,
            ring,
            Box::new(MemStorage::<Identifier, Identifier>::new()),
        )
    }

    /// Create a new unjoined PeerRing: every finger points to itself, no predecessor.
    pub fn new_with_storage(node: NodeRef, ring: Ring, storage: KeyStorage) -> Self {
        Self {
            finger: Arc::new(Mutex::new(FingerTable::new(node.clone(), ring))),
            predecessor: Arc::new(Mutex::new(None)),
            node,
            ring,
            storage,
        }
    }

    /// Identifier of current node.
    pub fn id(&self) -> Identifier {
        self.node.id
    }

    /// Return finger table of dht
    pub fn lock_finger(&self) -> Result<MutexGuard<FingerTable>> {
        self.finger.lock().map_err(|_| Error::DHTSyncLockError)
    }

    /// Return predecessor of dht
    pub fn lock_predecessor(&self) -> Result<MutexGuard<Option<NodeRef>>> {
        self.predecessor.lock().map_err(|_| Error::DHTSyncLockError)
    }

    /// The immediate successor.
    pub fn successor(&self) -> Result<NodeRef> {
        Ok(self.lock_finger()?.successor().clone())
    }

    /// The predecessor, `None` before joined.
    pub fn predecessor(&self) -> Result<Option<NodeRef>> {
        Ok(self.lock_predecessor()?.clone())
    }

    /// Overwrite the predecessor.
    pub fn set_predecessor(&self, node: Option<NodeRef>) -> Result<()> {
        *self.lock_predecessor()? = node;
        Ok(())
    }

    /// Overwrite finger `index`.
    pub fn set_finger(&self, index: usize, node: NodeRef) -> Result<()> {
        self.lock_finger()?.update(index, node)
    }

    /// Starts of all fingers in order of index.
    pub fn finger_starts(&self) -> Result<Vec<Identifier>> {
        Ok(self.lock_finger()?.list().iter().map(|e| e.start).collect())
    }

    /// Whether the node is alone on the ring: its successor is itself and its
    /// predecessor is itself or unset.
    pub fn is_alone(&self) -> Result<bool> {
        if self.successor()? != self.node {
            return Ok(false);
        }
        Ok(self
            .lock_predecessor()?
            .as_ref()
            .map_or(true, |p| p == &self.node))
    }

    /// Become the first node of a ring: every finger and the predecessor point to itself.
    pub fn create(&self) -> Result<()> {
        self.lock_finger()?.reset();
        self.set_predecessor(Some(self.node.clone()))
    }

    /// Back to the unjoined state.
    pub fn reset(&self) -> Result<()> {
        self.lock_finger()?.reset();
        self.set_predecessor(None)
    }

    /// Insert `key` into the local key set.
    pub async fn store(&self, key: Identifier) -> Result<()> {
        tracing::debug!("node {} store key {}", self.node.id, key);
        self.storage.put(&key, &key).await
    }

    /// Search `key` in the local key set.
    pub async fn search(&self, key: Identifier) -> Result<Option<Identifier>> {
        self.storage.get(&key).await
    }

    /// All keys stored on this node, in ascending order.
    pub async fn keys(&self) -> Result<Vec<Identifier>> {
        Ok(self
            .storage
            .get_all()
            .await?
            .into_iter()
            .map(|(k, _)| k)
            .collect())
    }

    /// Successor and predecessor of current node.
    pub fn topo_info(&self) -> Result<TopoInfo> {
        TopoInfo::try_from(self)
    }
}

impl Chord<PeerRingAction> for PeerRing {
    fn find_predecessor(&self, id: Identifier) -> Result<PeerRingAction> {
        let successor = self.successor()?;
        if self.ring.between(id, self.id(), successor.id, false, true) {
            return Ok(PeerRingAction::Some(self.node.clone()));
        }
        let next = self.closest_preceding_finger(id)?;
        if next == self.node {
            return Ok(PeerRingAction::Some(self.node.clone()));
        }
        Ok(PeerRingAction::RemoteAction(
            next,
            RemoteAction::FindPredecessor(id),
        ))
    }

    fn find_successor(&self, id: Identifier) -> Result<PeerRingAction> {
        if self.is_alone()? {
            return Ok(PeerRingAction::Some(self.node.clone()));
        }
        let successor = self.successor()?;
        if self.ring.between(id, self.id(), successor.id, false, true) {
            return Ok(PeerRingAction::Some(successor));
        }
        let next = self.closest_preceding_finger(id)?;
        if next == self.node {
            return Ok(PeerRingAction::Some(successor));
        }
        Ok(PeerRingAction::RemoteAction(
            next,
            RemoteAction::FindSuccessor(id),
        ))
    }

    fn closest_preceding_finger(&self, id: Identifier) -> Result<NodeRef> {
        Ok(self.lock_finger()?.closest_preceding_finger(id))
    }

    fn notify(&self, node: NodeRef) -> Result<NodeRef> {
        let mut predecessor = self.lock_predecessor()?;
        let adopt = match &*predecessor {
            None => true,
            Some(pred) => self.ring.between(node.id, pred.id, self.id(), false, false),
        };
        if adopt {
            tracing::debug!("node {} adopt predecessor {}", self.id(), node);
            *predecessor = Some(node.clone());
        }
        Ok(predecessor.clone().unwrap_or(node))
    }

    fn update_finger_table(&self, node: NodeRef, index: usize) -> Result<PeerRingAction> {
        if node == self.node {
            return Ok(PeerRingAction::None);
        }
        {
            let mut finger = self.lock_finger()?;
            let current = finger
                .get(index)
                .ok_or(Error::FingerIndexOutOfRange(index))?
                .node
                .clone();
            if !self.ring.between(node.id, self.id(), current.id, true, false) {
                return Ok(PeerRingAction::None);
            }
            finger.update(index, node.clone())?;
        }
        match self.predecessor()? {
            Some(pred) if pred != node && pred != self.node => Ok(PeerRingAction::RemoteAction(
                pred,
                RemoteAction::UpdateFingerTable(node, index),
            )),
            _ => Ok(PeerRingAction::Some(node)),
        }
    }

    fn stabilize(&self, info: TopoInfo) -> Result<PeerRingAction> {
        let successor = {
            let mut finger = self.lock_finger()?;
            let successor = finger.successor().clone();
            match info.predecessor {
                Some(x) if self.ring.between(x.id, self.id(), successor.id, false, false) => {
                    tracing::debug!("node {} adopt successor {}", self.id(), x);
                    finger.update(0, x.clone())?;
                    x
                }
                _ => successor,
            }
        };
        Ok(PeerRingAction::RemoteAction(
            successor,
            RemoteAction::Notify(self.node.clone()),
        ))
    }
}
