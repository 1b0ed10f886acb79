//! Stabilization wait to notify successors and update finger tables.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_timer::Delay;

use crate::error::Result;
use crate::node::ChordNode;

/// Periodic maintenance of one node, for long running rings.
/// A join runs one round by itself and does not need it.
#[derive(Clone)]
pub struct Stabilizer {
    node: Arc<ChordNode>,
    interval: Duration,
}

/// A trait with `wait` method.
#[async_trait]
pub trait TStabilize {
    /// Wait and poll
    async fn wait(self: Arc<Self>);
}

impl Stabilizer {
    /// Create a new instance of Stabilizer
    pub fn new(node: Arc<ChordNode>, interval: Duration) -> Self {
        Self { node, interval }
    }

    /// Get interval of waiting delays.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One round: stabilize then fix every finger. A node which has not joined is skipped.
    pub async fn stabilize(&self) -> Result<()> {
        if !self.node.is_joined() {
            return Ok(());
        }
        tracing::debug!("STABILIZATION of node {} start", self.node.id());
        self.node.stabilize().await?;
        self.node.fix_fingers().await
    }
}

#[async_trait]
impl TStabilize for Stabilizer {
    async fn wait(self: Arc<Self>) {
        loop {
            Delay::new(self.interval).await;
            self.stabilize()
                .await
                .unwrap_or_else(|e| tracing::error!("failed to stabilize {:?}", e));
        }
    }
}
