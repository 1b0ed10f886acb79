use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use dashmap::DashSet;
use rand::distributions::Distribution;

use crate::callback::InnerTransportCallback;
use crate::core::callback::BoxedTransportCallback;
use crate::core::transport::TransportInterface;
use crate::core::transport::TransportMessage;
use crate::error::Error;
use crate::error::Result;

/// An in-memory message substrate for local simulation.
/// Implements the [TransportInterface] trait with no real network.
///
/// Every registered address owns a callback. A message is delivered by spawning a task
/// that invokes the callback of the receiver, so the sender never waits for the handling.
#[derive(Default)]
pub struct MemoryTransport {
    endpoints: DashMap<String, Arc<InnerTransportCallback>>,
    links: DashSet<(String, String)>,
    delay: Option<(u64, u64)>,
}

impl MemoryTransport {
    /// Create a new [MemoryTransport] which delivers messages without delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every delivery by a random duration in `[min_ms, max_ms)`.
    pub fn with_delay(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.delay = Some((min_ms, max_ms));
        self
    }

    /// List all registered addresses.
    pub fn endpoints(&self) -> Vec<String> {
        self.endpoints.iter().map(|e| e.key().clone()).collect()
    }
}

#[async_trait]
impl TransportInterface for MemoryTransport {
    type Error = Error;

    fn register(&self, address: &str, callback: BoxedTransportCallback) -> Result<()> {
        if self.endpoints.contains_key(address) {
            return Err(Error::EndpointAlreadyExists(address.to_string()));
        }
        self.endpoints.insert(
            address.to_string(),
            Arc::new(InnerTransportCallback::new(address, callback)),
        );
        tracing::debug!("registered endpoint {}", address);
        Ok(())
    }

    fn connect(&self, local: &str, remote: &str) -> Result<()> {
        if local == remote {
            return Err(Error::ShouldNotConnectSelf(local.to_string()));
        }
        for address in [local, remote] {
            if !self.endpoints.contains_key(address) {
                return Err(Error::EndpointNotFound(address.to_string()));
            }
        }
        self.links.insert((local.to_string(), remote.to_string()));
        self.links.insert((remote.to_string(), local.to_string()));
        tracing::debug!("linked {} <-> {}", local, remote);
        Ok(())
    }

    fn is_connected(&self, local: &str, remote: &str) -> bool {
        self.links
            .contains(&(local.to_string(), remote.to_string()))
    }

    fn connection_ids(&self, local: &str) -> Vec<String> {
        self.links
            .iter()
            .filter(|link| link.0 == local)
            .map(|link| link.1.clone())
            .collect()
    }

    async fn send_message(&self, from: &str, to: &str, msg: TransportMessage) -> Result<()> {
        if !self.is_connected(from, to) {
            return Err(Error::ConnectionNotFound(from.to_string(), to.to_string()));
        }
        let callback = self
            .endpoints
            .get(to)
            .map(|cb| cb.value().clone())
            .ok_or_else(|| Error::EndpointNotFound(to.to_string()))?;
        let data = bincode::serialize(&msg).map(Bytes::from)?;

        let from = from.to_string();
        let delay = self.delay;
        tokio::spawn(async move {
            if let Some((low, high)) = delay {
                random_delay(low, high).await;
            }
            callback.on_message(&from, &data).await;
        });
        Ok(())
    }
}

async fn random_delay(low: u64, high: u64) {
    tokio::time::sleep(Duration::from_millis(random(low, high))).await;
}

fn random(low: u64, high: u64) -> u64 {
    if high <= low {
        return low;
    }
    let range = rand::distributions::Uniform::new(low, high);
    let mut rng = rand::thread_rng();
    range.sample(&mut rng)
}
