//! DHT types about `NodeRef` and `PeerRing`.
#![warn(missing_docs)]
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use super::ring::Identifier;
use crate::error::Result;

/// A non-owning handle used to reach another node through the transport.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    /// Position of the node on the ring.
    pub id: Identifier,
    /// Transport address of the node.
    pub address: String,
}

impl NodeRef {
    /// Create a handle from an id and the address it is registered under.
    pub fn new(id: Identifier, address: impl Into<String>) -> Self {
        Self {
            id,
            address: address.into(),
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.address)
    }
}

/// Successor and predecessor of a node, what a remote node needs to walk a lookup
/// or to stabilize against it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopoInfo {
    /// `finger[0]` of the node.
    pub successor: NodeRef,
    /// Predecessor of the node, `None` before it joined.
    pub predecessor: Option<NodeRef>,
}

/// Chord is a distributed lookup protocol: given an identifier, it maps the
/// identifier onto the node responsible for it. You may want to browse the
/// [paper](https://pdos.csail.mit.edu/papers/ton:chord/paper-ton.pdf) before you read this.
///
/// The methods here only see the local state of one node. Some of them return an `Action`
/// which tells the outer the extra remote call to take after handling data inside the struct,
/// since the answer may be recorded in another node.
pub trait Chord<Action> {
    /// Ask the local table for the predecessor of `id`.
    /// Returns this node if `id` lies in `(self, successor]`, otherwise a remote action
    /// to continue the walk from the closest preceding finger.
    fn find_predecessor(&self, id: Identifier) -> Result<Action>;

    /// Ask the local table for the successor of `id`.
    /// May return a remote action when the successor is recorded in another node.
    fn find_successor(&self, id: Identifier) -> Result<Action>;

    /// Scan the fingers from the farthest down and return the first node strictly inside
    /// `(self, id)`, or this node when there is none.
    fn closest_preceding_finger(&self, id: Identifier) -> Result<NodeRef>;

    /// Notify this node that `node` may be its predecessor.
    /// Returns the predecessor after updating.
    fn notify(&self, node: NodeRef) -> Result<NodeRef>;

    /// Install `node` as finger `index` when it improves the slot.
    /// Returns a remote action when the update should propagate to the predecessor.
    fn update_finger_table(&self, node: NodeRef, index: usize) -> Result<Action>;

    /// Adopt the predecessor reported by the successor when it sits between this node
    /// and the successor, then return the remote action notifying the successor.
    fn stabilize(&self, info: TopoInfo) -> Result<Action>;
}
