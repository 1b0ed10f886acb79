//! Serializable snapshots of a node, for diagnostics.
use serde::Deserialize;
use serde::Serialize;

use crate::dht::PeerRing;
use crate::measure::MeasureSnapshot;
use crate::node::ChordNode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInspect {
    pub dht: DHTInspect,
    pub keys: Vec<u64>,
    pub connections: Vec<String>,
    pub measure: MeasureSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DHTInspect {
    pub id: u64,
    pub address: String,
    pub successor: Option<u64>,
    #[serde(default)]
    pub predecessor: Option<u64>,
    /// `(node, first index, last index)`, consecutive fingers on the same node are merged.
    pub finger_table: Vec<(u64, u64, u64)>,
}

impl NodeInspect {
    pub async fn inspect(node: &ChordNode) -> Self {
        let dht = DHTInspect::inspect(&node.dht());
        let keys = node
            .dht()
            .keys()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|k| k.value())
            .collect();
        let connections = node
            .transport()
            .transport()
            .connection_ids(&node.node_ref().address);
        Self {
            dht,
            keys,
            connections,
            measure: node.measure().snapshot(),
        }
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl DHTInspect {
    pub fn inspect(dht: &PeerRing) -> Self {
        let successor = dht.successor().ok().map(|s| s.id.value());
        let predecessor = dht.predecessor().ok().flatten().map(|p| p.id.value());
        let finger_table = dht
            .lock_finger()
            .map(|ft| compress_iter(ft.list().iter().map(|e| e.node.id.value())))
            .unwrap_or_default();

        Self {
            id: dht.id().value(),
            address: dht.node.address.clone(),
            successor,
            predecessor,
            finger_table,
        }
    }
}

/// Merge runs of equal items into `(item, first index, last index)`.
pub fn compress_iter<T>(iter: impl Iterator<Item = T>) -> Vec<(T, u64, u64)>
where T: PartialEq {
    let mut runs: Vec<(T, u64, u64)> = vec![];
    for (i, x) in iter.enumerate() {
        let i = i as u64;
        match runs.last_mut() {
            Some((item, _, last)) if *item == x => *last = i,
            _ => runs.push((x, i, i)),
        }
    }
    runs
}
