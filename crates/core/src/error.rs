//! Error of chord_core

/// A wrap `Result` contains custom errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors collections in chord-core.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Remote call {message} to {target} timed out")]
    Timeout {
        target: String,
        message: &'static str,
    },

    #[error("Node has not joined any ring")]
    RingEmpty,

    #[error("Ring bit width {0} is not in 1..=63")]
    InvalidRingBits(u8),

    #[error("Identifier {0} is out of the ring of size {1}")]
    IdentifierOutOfRange(u64, u64),

    #[error("Identifier {0} is already a member of the ring")]
    DuplicateIdentifier(u64),

    #[error("Unexpected response, expected {expected}, got {got}")]
    UnexpectedResponse {
        expected: &'static str,
        got: &'static str,
    },

    #[error("Lookup of {0} exceeded the hop limit")]
    LookupHopLimit(u64),

    #[error("Finger index {0} out of range")]
    FingerIndexOutOfRange(usize),

    #[error("Failed to lock finger table or predecessor of dht")]
    DHTSyncLockError,

    #[error("Unexpected action of PeerRing: {0}")]
    PeerRingUnexpectedAction(String),

    #[error("Pending request {0} was dropped before answered")]
    PendingRequestDropped(u64),

    #[error("Join aborted: {0}")]
    JoinAborted(Box<Error>),

    #[error("Bincode serialization error")]
    BincodeSerialize(#[source] bincode::Error),

    #[error("Bincode deserialization error")]
    BincodeDeserialize(#[source] bincode::Error),

    #[error("JSON serialization error")]
    SerializeToString(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] chord_transport::error::Error),
}
