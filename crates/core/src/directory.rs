//! Peer directory used to bootstrap joins.
//!
//! The directory is not a routing structure: a node only asks it which members exist
//! when it joins, and registers itself once the join is done.
use dashmap::DashMap;

use crate::dht::Identifier;
use crate::dht::NodeRef;

/// Registry of the members of one ring. Construct one per ring and inject it into every node.
#[derive(Debug, Default)]
pub struct PeerDirectory {
    members: DashMap<Identifier, NodeRef>,
}

impl PeerDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node` as a member, replacing a previous entry with the same id.
    pub fn register(&self, node: NodeRef) {
        tracing::info!("directory register node {}", node);
        self.members.insert(node.id, node);
    }

    /// Get the handle of member `id`.
    pub fn lookup(&self, id: Identifier) -> Option<NodeRef> {
        self.members.get(&id).map(|v| v.value().clone())
    }

    /// The member with the lowest id other than `excluding`.
    pub fn any_other_member(&self, excluding: Identifier) -> Option<NodeRef> {
        self.members
            .iter()
            .filter(|e| *e.key() != excluding)
            .min_by_key(|e| *e.key())
            .map(|e| e.value().clone())
    }

    /// All members sorted by id.
    pub fn members(&self) -> Vec<NodeRef> {
        let mut members: Vec<NodeRef> = self.members.iter().map(|e| e.value().clone()).collect();
        members.sort_by_key(|n| n.id);
        members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// is empty
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
