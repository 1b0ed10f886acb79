//! Request/response correlation over a fire-and-forget transport.
use std::sync::Arc;
use std::time::Duration;

use chord_transport::core::transport::TransportInterface;
use chord_transport::core::transport::TransportMessage;

use crate::dht::NodeRef;
use crate::error::Error;
use crate::error::Result;
use crate::measure::MeasureCounter;
use crate::measure::MeasureImpl;
use crate::message::types::Message;
use crate::message::types::Report;
use crate::message::MessagePayload;
use crate::message::PendingRequests;

/// The transport a node sends its payloads through.
pub type SharedTransport =
    Arc<dyn TransportInterface<Error = chord_transport::error::Error> + Send + Sync>;

/// The RPC layer of a node. Every request gets a transaction id and the caller
/// suspends on a one-shot channel until the report arrives or the deadline passes.
pub struct NodeTransport {
    transport: SharedTransport,
    local: NodeRef,
    pending: PendingRequests,
    timeout: Duration,
    retries: u8,
    measure: MeasureImpl,
}

impl NodeTransport {
    /// Create the RPC layer of `local`.
    pub fn new(
        transport: SharedTransport,
        local: NodeRef,
        timeout: Duration,
        retries: u8,
        measure: MeasureImpl,
    ) -> Self {
        Self {
            transport,
            local,
            pending: PendingRequests::new(),
            timeout,
            retries,
            measure,
        }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &SharedTransport {
        &self.transport
    }

    /// Number of requests still waiting for their report.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Establish a bidirectional link to `peer`.
    pub fn connect(&self, peer: &NodeRef) -> Result<()> {
        if self.transport.is_connected(&self.local.address, &peer.address) {
            return Ok(());
        }
        self.transport
            .connect(&self.local.address, &peer.address)
            .map_err(Error::Transport)
    }

    /// Deadline of a single remote call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `data` to `target` and wait for the report of type `T`.
    pub async fn request<T: Report>(&self, target: &NodeRef, data: Message) -> Result<T> {
        self.request_with_timeout(target, data, self.timeout).await
    }

    /// Same as [NodeTransport::request] with a custom deadline, for requests whose
    /// handling makes remote calls itself.
    pub async fn request_with_timeout<T: Report>(
        &self,
        target: &NodeRef,
        data: Message,
        timeout: Duration,
    ) -> Result<T> {
        let name = data.name();
        let mut attempt = 0;
        let report = loop {
            match self.request_once(target, data.clone(), timeout).await {
                Err(Error::Timeout { .. }) if attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(
                        "{} to {} timed out, retry {}/{}",
                        name,
                        target,
                        attempt,
                        self.retries
                    );
                }
                ret => break ret?,
            }
        };
        let got = report.name();
        T::from_message(report).ok_or(Error::UnexpectedResponse {
            expected: T::NAME,
            got,
        })
    }

    async fn request_once(
        &self,
        target: &NodeRef,
        data: Message,
        timeout: Duration,
    ) -> Result<Message> {
        self.measure.incr(MeasureCounter::RemoteRequest);
        let name = data.name();
        let (tx_id, rx) = self.pending.register();
        let payload = MessagePayload::new_send(data, self.local.clone(), target.clone(), tx_id);
        tracing::debug!("node {} send {} to {}, tx {}", self.local.id, name, target, tx_id);
        if let Err(e) = self.send_payload(&payload).await {
            self.pending.cancel(tx_id);
            return Err(e);
        }
        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(report)) => Ok(report.data),
            Ok(Err(_)) => Err(Error::PendingRequestDropped(tx_id)),
            Err(_) => {
                self.pending.cancel(tx_id);
                self.measure.incr(MeasureCounter::RemoteTimeout);
                Err(Error::Timeout {
                    target: target.to_string(),
                    message: name,
                })
            }
        }
    }

    /// Answer the request `ctx` with `data`.
    pub async fn send_report(&self, ctx: &MessagePayload, data: Message) -> Result<()> {
        self.send_payload(&ctx.report(data)).await
    }

    /// Hand an incoming report to the caller waiting for it.
    pub fn resolve(&self, payload: MessagePayload) {
        let tx_id = payload.tx_id;
        if !self.pending.resolve(payload) {
            tracing::debug!("node {} drop late report of tx {}", self.local.id, tx_id);
        }
    }

    async fn send_payload(&self, payload: &MessagePayload) -> Result<()> {
        let data = payload.to_bincode()?;
        self.transport
            .send_message(
                &self.local.address,
                &payload.destination.address,
                TransportMessage::Custom(data),
            )
            .await
            .map_err(Error::Transport)
    }
}
