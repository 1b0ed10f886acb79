use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chord_transport::connections::MemoryTransport;
use chord_transport::core::callback::BoxedTransportCallback;
use chord_transport::core::callback::TransportCallback;
use chord_transport::core::transport::TransportInterface;
use chord_transport::core::transport::TransportMessage;

use crate::dht::Identifier;
use crate::dht::NodeRef;
use crate::directory::PeerDirectory;
use crate::error::Result;
use crate::node::ChordNode;
use crate::node::NodeBuilder;

mod test_join;
mod test_lookup;
mod test_rpc;
mod test_stabilization;
mod test_storage;

/// A ring of nodes sharing one in-memory transport and one directory.
pub struct TestRing {
    pub bits: u8,
    pub transport: Arc<MemoryTransport>,
    pub directory: Arc<PeerDirectory>,
    pub nodes: Vec<Arc<ChordNode>>,
    pub rpc_timeout: Duration,
}

/// An endpoint which swallows every message, as a node that never answers.
pub struct SilentCallback;

#[async_trait]
impl TransportCallback for SilentCallback {}

/// Passes the first `allowed` messages sent from `from` to the inner transport and
/// drops the rest without an error, as a node whose link breaks halfway.
pub struct DroppingTransport {
    inner: Arc<MemoryTransport>,
    from: String,
    allowed: usize,
    sent: AtomicUsize,
}

impl DroppingTransport {
    pub fn new(inner: Arc<MemoryTransport>, from: &str, allowed: usize) -> Self {
        Self {
            inner,
            from: from.to_string(),
            allowed,
            sent: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TransportInterface for DroppingTransport {
    type Error = chord_transport::error::Error;

    fn register(
        &self,
        address: &str,
        callback: BoxedTransportCallback,
    ) -> std::result::Result<(), Self::Error> {
        self.inner.register(address, callback)
    }

    fn connect(&self, local: &str, remote: &str) -> std::result::Result<(), Self::Error> {
        self.inner.connect(local, remote)
    }

    fn is_connected(&self, local: &str, remote: &str) -> bool {
        self.inner.is_connected(local, remote)
    }

    fn connection_ids(&self, local: &str) -> Vec<String> {
        self.inner.connection_ids(local)
    }

    async fn send_message(
        &self,
        from: &str,
        to: &str,
        msg: TransportMessage,
    ) -> std::result::Result<(), Self::Error> {
        if from == self.from && self.sent.fetch_add(1, Ordering::SeqCst) >= self.allowed {
            return Ok(());
        }
        self.inner.send_message(from, to, msg).await
    }
}

impl TestRing {
    pub fn new(bits: u8) -> Self {
        Self::with_transport(bits, MemoryTransport::new())
    }

    pub fn with_transport(bits: u8, transport: MemoryTransport) -> Self {
        Self {
            bits,
            transport: Arc::new(transport),
            directory: Arc::new(PeerDirectory::new()),
            nodes: vec![],
            rpc_timeout: Duration::from_secs(1),
        }
    }

    pub fn rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }

    pub fn prepare_node(&self, id: u64) -> Result<Arc<ChordNode>> {
        NodeBuilder::new(id, self.transport.clone(), self.directory.clone())
            .ring_bits(self.bits)
            .rpc_timeout(self.rpc_timeout)
            .build()
    }

    pub fn prepare_node_at(&self, id: u64, address: &str) -> Result<Arc<ChordNode>> {
        NodeBuilder::new(id, self.transport.clone(), self.directory.clone())
            .ring_bits(self.bits)
            .rpc_timeout(self.rpc_timeout)
            .address(address)
            .build()
    }

    pub async fn join(&mut self, id: u64) -> Result<Arc<ChordNode>> {
        let node = self.prepare_node(id)?;
        node.join().await?;
        self.nodes.push(node.clone());
        Ok(node)
    }

    pub async fn join_all(bits: u8, ids: &[u64]) -> Result<Self> {
        let mut ring = Self::new(bits);
        for id in ids {
            ring.join(*id).await?;
        }
        Ok(ring)
    }

    pub fn node(&self, id: u64) -> &Arc<ChordNode> {
        self.nodes
            .iter()
            .find(|n| n.id() == Identifier::new(id))
            .unwrap()
    }

    /// Register an endpoint in the directory which never answers.
    pub fn register_silent(&self, id: u64) -> NodeRef {
        let node = NodeRef::new(id.into(), format!("mem://silent/{id}"));
        self.transport
            .register(&node.address, Box::new(SilentCallback))
            .unwrap();
        self.directory.register(node.clone());
        node
    }

    pub fn sorted_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.nodes.iter().map(|n| n.id().value()).collect();
        ids.sort();
        ids
    }

    /// The member responsible for `key`: the first id at or after it, wrapping around.
    pub fn expected_successor(&self, key: u64) -> u64 {
        let ids = self.sorted_ids();
        ids.iter().copied().find(|id| *id >= key).unwrap_or(ids[0])
    }

    /// The member whose arc `(member, successor]` holds `key`.
    pub fn expected_predecessor(&self, key: u64) -> u64 {
        let ids = self.sorted_ids();
        ids.iter()
            .rev()
            .copied()
            .find(|id| *id < key)
            .unwrap_or(ids[ids.len() - 1])
    }
}

/// Successors of all nodes form a single cycle in ascending order of id, and every
/// node is the predecessor of its successor.
pub fn assert_successor_cycle(ring: &TestRing) {
    let ids = ring.sorted_ids();
    for (i, id) in ids.iter().enumerate() {
        let next = ids[(i + 1) % ids.len()];
        let dht = ring.node(*id).dht();
        assert_eq!(
            dht.successor().unwrap().id.value(),
            next,
            "successor of {id}"
        );
        assert_eq!(
            ring.node(next).dht().predecessor().unwrap().unwrap().id.value(),
            *id,
            "predecessor of {next}"
        );
    }
}

/// Every finger of every node points to the successor of its start.
pub fn assert_fingers_correct(ring: &TestRing) {
    for node in ring.nodes.iter() {
        let dht = node.dht();
        let finger = dht.lock_finger().unwrap();
        for (i, entry) in finger.list().iter().enumerate() {
            assert_eq!(
                entry.node.id.value(),
                ring.expected_successor(entry.start.value()),
                "finger {i} of node {}",
                node.id()
            );
        }
    }
}
