#![warn(missing_docs)]
//! This module provider [NodeBuilder] and it's interface for
//! [ChordNode]

use std::sync::Arc;
use std::time::Duration;

use crate::consts::DEFAULT_RING_BITS;
use crate::consts::DEFAULT_RPC_RETRIES;
use crate::consts::DEFAULT_RPC_TIMEOUT_MS;
use crate::consts::MEMORY_ADDRESS_PREFIX;
use crate::dht::KeyStorage;
use crate::dht::NodeRef;
use crate::dht::PeerRing;
use crate::dht::Ring;
use crate::directory::PeerDirectory;
use crate::error::Result;
use crate::measure::MeasureImpl;
use crate::measure::MemMeasure;
use crate::node::ChordNode;
use crate::node::InnerNodeCallback;
use crate::node::NodeTransport;
use crate::node::SharedTransport;

/// Creates a NodeBuilder to configure a ChordNode.
pub struct NodeBuilder {
    id: u64,
    address: Option<String>,
    ring_bits: u8,
    rpc_timeout: Duration,
    rpc_retries: u8,
    transport: SharedTransport,
    directory: Arc<PeerDirectory>,
    storage: Option<KeyStorage>,
    measure: Option<MeasureImpl>,
}

impl NodeBuilder {
    /// Creates new instance of [NodeBuilder] for node `id` of the ring served by
    /// `transport` and `directory`.
    pub fn new(id: u64, transport: SharedTransport, directory: Arc<PeerDirectory>) -> Self {
        NodeBuilder {
            id,
            address: None,
            ring_bits: DEFAULT_RING_BITS,
            rpc_timeout: Duration::from_millis(DEFAULT_RPC_TIMEOUT_MS),
            rpc_retries: DEFAULT_RPC_RETRIES,
            transport,
            directory,
            storage: None,
            measure: None,
        }
    }

    /// Sets up the bit width of the identifier space.
    pub fn ring_bits(mut self, bits: u8) -> Self {
        self.ring_bits = bits;
        self
    }

    /// Sets up the transport address, defaults to `mem://<id>`.
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets up the deadline of every remote call.
    pub fn rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }

    /// Sets up how many times a timed out call is retried against the same target.
    pub fn rpc_retries(mut self, retries: u8) -> Self {
        self.rpc_retries = retries;
        self
    }

    /// Bind key storage for ChordNode.
    pub fn storage(mut self, storage: KeyStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Bind measurement function for ChordNode.
    pub fn measure(mut self, implement: MeasureImpl) -> Self {
        self.measure = Some(implement);
        self
    }

    /// Try build for `ChordNode` and register it on the transport.
    /// The node is created unjoined, see [ChordNode::join].
    pub fn build(self) -> Result<Arc<ChordNode>> {
        let ring = Ring::new(self.ring_bits)?;
        let id = ring.id(self.id)?;
        let address = self
            .address
            .unwrap_or_else(|| format!("{}{}", MEMORY_ADDRESS_PREFIX, id));
        let node_ref = NodeRef::new(id, address);

        let dht = Arc::new(match self.storage {
            Some(storage) => PeerRing::new_with_storage(node_ref.clone(), ring, storage),
            None => PeerRing::new(node_ref.clone(), ring),
        });
        let measure = self
            .measure
            .unwrap_or_else(|| Arc::new(MemMeasure::new()) as MeasureImpl);
        let transport = Arc::new(NodeTransport::new(
            self.transport.clone(),
            node_ref.clone(),
            self.rpc_timeout,
            self.rpc_retries,
            measure.clone(),
        ));

        let node = Arc::new(ChordNode::new(dht, transport, self.directory, measure));
        self.transport.register(
            &node_ref.address,
            Box::new(InnerNodeCallback::new(Arc::downgrade(&node))),
        )?;
        Ok(node)
    }
}
