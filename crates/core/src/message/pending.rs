use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use dashmap::DashMap;
use tokio::sync::oneshot;

use crate::message::payload::MessagePayload;

/// Requests waiting for their report, keyed by transaction id.
#[derive(Debug, Default)]
pub struct PendingRequests {
    next_tx_id: AtomicU64,
    table: DashMap<u64, oneshot::Sender<MessagePayload>>,
}

impl PendingRequests {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a transaction id and the channel its report will arrive on.
    pub fn register(&self) -> (u64, oneshot::Receiver<MessagePayload>) {
        let tx_id = self.next_tx_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.table.insert(tx_id, tx);
        (tx_id, rx)
    }

    /// Hand a report to its waiting caller. Returns false when nobody waits any more,
    /// e.g. the call already timed out.
    pub fn resolve(&self, payload: MessagePayload) -> bool {
        match self.table.remove(&payload.tx_id) {
            Some((_, tx)) => tx.send(payload).is_ok(),
            None => false,
        }
    }

    /// Drop a pending entry.
    pub fn cancel(&self, tx_id: u64) {
        self.table.remove(&tx_id);
    }

    /// Number of requests still waiting.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// is empty
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
