#![warn(missing_docs)]
//! Implementation of the Chord DHT,
//! ref: <https://pdos.csail.mit.edu/papers/ton:chord/paper-ton.pdf>
//! With high probability, the number of nodes that must be contacted to find a successor in an N-node network is O(log N).

mod chord;
/// Finger table of a node
pub mod finger;
pub mod ring;
mod stabilization;
pub mod types;

pub use chord::KeyStorage;
pub use chord::PeerRing;
pub use chord::PeerRingAction;
pub use chord::RemoteAction as PeerRingRemoteAction;
pub use finger::FingerTable;
pub use finger::FingerTableEntry;
pub use ring::Identifier;
pub use ring::Ring;
pub use stabilization::Stabilizer;
pub use stabilization::TStabilize;
pub use types::Chord;
pub use types::NodeRef;
pub use types::TopoInfo;
