//! A whole ring living in one process, driven from a [Config].
use std::sync::Arc;

use chord_core::dht::Identifier;
use chord_core::dht::Stabilizer;
use chord_core::dht::TStabilize;
use chord_core::directory::PeerDirectory;
use chord_core::inspect::NodeInspect;
use chord_core::measure::MeasureCounter;
use chord_core::node::ChordNode;
use chord_core::node::NodeBuilder;
use chord_transport::connections::MemoryTransport;
use serde::Deserialize;
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::Error;
use crate::error::Result;

/// Where a key ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPlacement {
    pub key: u64,
    pub owner: u64,
}

/// Requests sent per `get`, issued from every node for every key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupStats {
    pub lookups: u64,
    pub found: u64,
    pub total_requests: u64,
    pub max_requests: u64,
    pub mean_requests: f64,
}

impl LookupStats {
    fn record(&mut self, requests: u64, found: bool) {
        self.lookups += 1;
        self.found += u64::from(found);
        self.total_requests += requests;
        self.max_requests = self.max_requests.max(requests);
        self.mean_requests = self.total_requests as f64 / self.lookups as f64;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub ring_bits: u8,
    pub nodes: Vec<NodeInspect>,
    pub placements: Vec<KeyPlacement>,
    pub lookups: LookupStats,
}

impl SimulationReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub struct Simulation {
    config: Config,
    transport: Arc<MemoryTransport>,
    directory: Arc<PeerDirectory>,
    nodes: Vec<Arc<ChordNode>>,
    stabilizers: Vec<JoinHandle<()>>,
}

impl Simulation {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let transport = match config.transport_delay {
            Some(delay) => MemoryTransport::new().with_delay(delay.min_ms, delay.max_ms),
            None => MemoryTransport::new(),
        };
        Ok(Self {
            config,
            transport: Arc::new(transport),
            directory: Arc::new(PeerDirectory::new()),
            nodes: vec![],
            stabilizers: vec![],
        })
    }

    /// Build, join and store everything the config lists, then report.
    pub async fn run(config: Config) -> Result<SimulationReport> {
        let mut sim = Self::new(config)?;
        sim.join_all().await?;
        let placements = sim.put_keys().await?;
        let report = sim.report(placements).await;
        sim.shutdown();
        report
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn nodes(&self) -> &[Arc<ChordNode>] {
        &self.nodes
    }

    pub fn node(&self, id: u64) -> Result<Arc<ChordNode>> {
        self.nodes
            .iter()
            .find(|n| n.id().value() == id)
            .cloned()
            .ok_or(Error::UnknownNode(id))
    }

    /// Join the nodes one after another, in config order.
    pub async fn join_all(&mut self) -> Result<()> {
        for id in self.config.nodes.clone() {
            let node = NodeBuilder::new(id, self.transport.clone(), self.directory.clone())
                .ring_bits(self.config.ring_bits)
                .rpc_timeout(self.config.rpc_timeout())
                .rpc_retries(self.config.rpc_retries)
                .build()?;
            node.join().await?;
            if let Some(interval) = self.config.stabilize_interval() {
                let stabilizer = Arc::new(Stabilizer::new(node.clone(), interval));
                self.stabilizers.push(tokio::spawn(stabilizer.wait()));
            }
            tracing::info!("{} of {} nodes joined", self.nodes.len() + 1, self.config.nodes.len());
            self.nodes.push(node);
        }
        Ok(())
    }

    /// Store every key, the i-th key through the i-th node (cycling).
    pub async fn put_keys(&self) -> Result<Vec<KeyPlacement>> {
        let Some(first) = self.nodes.first() else {
            return Err(chord_core::error::Error::RingEmpty.into());
        };
        let mut placements = Vec::with_capacity(self.config.keys.len());
        for (i, key) in self.config.keys.iter().enumerate() {
            let via = self.nodes.get(i % self.nodes.len()).unwrap_or(first);
            let owner = via.put(Identifier::from(*key)).await?;
            placements.push(KeyPlacement {
                key: *key,
                owner: owner.id.value(),
            });
        }
        Ok(placements)
    }

    /// Get every key from every node, counting the requests of each lookup.
    /// Counters of a node are reset before each of its lookups.
    pub async fn lookup_stats(&self) -> Result<LookupStats> {
        let mut stats = LookupStats::default();
        for node in self.nodes.iter() {
            for key in self.config.keys.iter() {
                node.measure().reset();
                let found = node.get(Identifier::from(*key)).await?;
                let requests = node.measure().get_count(MeasureCounter::RemoteRequest);
                stats.record(requests, found.is_some());
            }
        }
        Ok(stats)
    }

    /// Snapshot every node before the lookups reset their counters.
    pub async fn report(&self, placements: Vec<KeyPlacement>) -> Result<SimulationReport> {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for node in self.nodes.iter() {
            nodes.push(NodeInspect::inspect(node).await);
        }
        nodes.sort_by_key(|n| n.dht.id);
        let lookups = self.lookup_stats().await?;
        Ok(SimulationReport {
            ring_bits: self.config.ring_bits,
            nodes,
            placements,
            lookups,
        })
    }

    /// Stop the periodic stabilizers.
    pub fn shutdown(&mut self) {
        for handle in self.stabilizers.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.shutdown();
    }
}
