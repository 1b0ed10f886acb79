#![warn(missing_docs)]
//! Chord node: one member of the ring together with its RPC layer.
//! Lookups, join and stabilization live in the submodules as `impl ChordNode` blocks.
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

mod builder;
mod callback;
mod join;
mod lookup;
mod stabilize;
mod storage;
pub mod transport;

pub use builder::NodeBuilder;
pub use callback::InnerNodeCallback;
pub use transport::NodeTransport;
pub use transport::SharedTransport;

use crate::consts::MAX_LOOKUP_HOPS;
use crate::dht::Identifier;
use crate::dht::NodeRef;
use crate::dht::PeerRing;
use crate::dht::Ring;
use crate::directory::PeerDirectory;
use crate::error::Error;
use crate::error::Result;
use crate::measure::MeasureImpl;

/// A member of the ring. Owns its routing state ([PeerRing]) and reaches other nodes only
/// through requests sent by its [NodeTransport].
pub struct ChordNode {
    pub(crate) dht: Arc<PeerRing>,
    pub(crate) transport: Arc<NodeTransport>,
    pub(crate) directory: Arc<PeerDirectory>,
    pub(crate) measure: MeasureImpl,
    joined: AtomicBool,
}

impl ChordNode {
    pub(crate) fn new(
        dht: Arc<PeerRing>,
        transport: Arc<NodeTransport>,
        directory: Arc<PeerDirectory>,
        measure: MeasureImpl,
    ) -> Self {
        Self {
            dht,
            transport,
            directory,
            measure,
            joined: AtomicBool::new(false),
        }
    }

    /// Identifier of this node.
    pub fn id(&self) -> Identifier {
        self.dht.id()
    }

    /// Handle of this node.
    pub fn node_ref(&self) -> NodeRef {
        self.dht.node.clone()
    }

    /// Identifier space of this node.
    pub fn ring(&self) -> Ring {
        self.dht.ring
    }

    /// Local routing state.
    pub fn dht(&self) -> Arc<PeerRing> {
        self.dht.clone()
    }

    /// RPC layer.
    pub fn transport(&self) -> Arc<NodeTransport> {
        self.transport.clone()
    }

    /// Directory this node joins through.
    pub fn directory(&self) -> Arc<PeerDirectory> {
        self.directory.clone()
    }

    /// Lookup counters of this node.
    pub fn measure(&self) -> &MeasureImpl {
        &self.measure
    }

    /// Whether [ChordNode::join] completed.
    pub fn is_joined(&self) -> bool {
        self.joined.load(Ordering::SeqCst)
    }

    pub(crate) fn set_joined(&self, joined: bool) {
        self.joined.store(joined, Ordering::SeqCst)
    }

    pub(crate) fn ensure_joined(&self) -> Result<()> {
        if !self.is_joined() {
            return Err(Error::RingEmpty);
        }
        Ok(())
    }

    pub(crate) fn is_self(&self, node: &NodeRef) -> bool {
        node.id == self.id()
    }

    pub(crate) fn hop_limit(&self) -> u64 {
        self.ring().size().min(MAX_LOOKUP_HOPS)
    }

    /// Calls of one lookup over correct fingers: at most one hop per bit, two requests
    /// per hop, and the final topology query.
    pub(crate) fn lookup_calls(&self) -> u32 {
        2 * u32::from(self.ring().bits()) + 1
    }
}
