//! This module provide the `Measure` trait and its in-memory implementation.
//! It is used to count how much work the lookups of a node take.
#![warn(missing_docs)]
use std::sync::Arc;

use dashmap::DashMap;
use serde::Deserialize;
use serde::Serialize;

/// Type of Measure, see [Measure].
pub type MeasureImpl = Arc<dyn Measure + Send + Sync>;

/// The tag of counters in measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasureCounter {
    /// The number of find_successor invocations.
    FindSuccessor,
    /// The number of find_predecessor invocations.
    FindPredecessor,
    /// The number of closest_preceding_finger invocations, local or remote.
    ClosestPrecedingFinger,
    /// The number of requests sent to other nodes.
    RemoteRequest,
    /// The number of requests which got no report in time.
    RemoteTimeout,
}

/// All counters at one moment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureSnapshot {
    /// see [MeasureCounter::FindSuccessor]
    pub find_successor: u64,
    /// see [MeasureCounter::FindPredecessor]
    pub find_predecessor: u64,
    /// see [MeasureCounter::ClosestPrecedingFinger]
    pub closest_preceding_finger: u64,
    /// see [MeasureCounter::RemoteRequest]
    pub remote_request: u64,
    /// see [MeasureCounter::RemoteTimeout]
    pub remote_timeout: u64,
}

/// `Measure` counts the behaviour of one node.
/// The method [Measure::incr] should be called in the proper places.
pub trait Measure {
    /// `incr` increments the counter.
    fn incr(&self, counter: MeasureCounter);
    /// `get_count` returns the counter.
    fn get_count(&self, counter: MeasureCounter) -> u64;
    /// Set every counter back to zero, e.g. before measuring the path length of one lookup.
    fn reset(&self);

    /// Read all counters.
    fn snapshot(&self) -> MeasureSnapshot {
        MeasureSnapshot {
            find_successor: self.get_count(MeasureCounter::FindSuccessor),
            find_predecessor: self.get_count(MeasureCounter::FindPredecessor),
            closest_preceding_finger: self.get_count(MeasureCounter::ClosestPrecedingFinger),
            remote_request: self.get_count(MeasureCounter::RemoteRequest),
            remote_timeout: self.get_count(MeasureCounter::RemoteTimeout),
        }
    }
}

/// Counters kept in memory.
#[derive(Debug, Default)]
pub struct MemMeasure {
    counters: DashMap<MeasureCounter, u64>,
}

impl MemMeasure {
    /// Create a new measure with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Measure for MemMeasure {
    fn incr(&self, counter: MeasureCounter) {
        *self.counters.entry(counter).or_insert(0) += 1;
    }

    fn get_count(&self, counter: MeasureCounter) -> u64 {
        self.counters.get(&counter).map(|v| *v).unwrap_or(0)
    }

    fn reset(&self) {
        self.counters.clear();
    }
}
