#![warn(missing_docs)]
use std::ops::Index;

use serde::Deserialize;
use serde::Serialize;

use super::ring::Identifier;
use super::ring::Ring;
use super::types::NodeRef;
use crate::error::Error;
use crate::error::Result;

/// One slot of a [FingerTable].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerTableEntry {
    /// `(owner + 2^i) mod 2^m`, fixed at creation.
    pub start: Identifier,
    /// The node currently believed to be the successor of `start`.
    pub node: NodeRef,
}

/// Finger table of Chord DHT.
/// Entry `i` points to the successor of `owner + 2^i`, entry 0 is the immediate successor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerTable {
    owner: NodeRef,
    ring: Ring,
    entries: Vec<FingerTableEntry>,
}

impl FingerTable {
    /// builder, every entry points to the owner.
    pub fn new(owner: NodeRef, ring: Ring) -> Self {
        let entries = (0..ring.bits() as usize)
            .map(|i| FingerTableEntry {
                start: ring.finger_start(owner.id, i),
                node: owner.clone(),
            })
            .collect();
        Self {
            owner,
            ring,
            entries,
        }
    }

    /// len
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// getter
    pub fn get(&self, index: usize) -> Option<&FingerTableEntry> {
        self.entries.get(index)
    }

    /// All entries in order of index.
    pub fn list(&self) -> &[FingerTableEntry] {
        &self.entries
    }

    /// The immediate successor, `entries[0].node`.
    pub fn successor(&self) -> &NodeRef {
        // The table holds `bits >= 1` entries since construction.
        &self.entries[0].node
    }

    /// setter
    pub fn update(&mut self, index: usize, node: NodeRef) -> Result<()> {
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(Error::FingerIndexOutOfRange(index))?;
        if entry.node != node {
            tracing::debug!(
                "node {} set finger {} (start {}) to {}",
                self.owner.id,
                index,
                entry.start,
                node
            );
        }
        entry.node = node;
        Ok(())
    }

    /// Point every entry back to the owner.
    pub fn reset(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.node = self.owner.clone();
        }
    }

    /// get closest preceding finger of `id`, scanning from index m-1 down to 0.
    pub fn closest_preceding_finger(&self, id: Identifier) -> NodeRef {
        self.entries
            .iter()
            .rev()
            .map(|entry| &entry.node)
            .find(|node| self.ring.between(node.id, self.owner.id, id, false, false))
            .unwrap_or(&self.owner)
            .clone()
    }
}

impl Index<usize> for FingerTable {
    type Output = FingerTableEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}
