//! Chord: a self-organizing ring answering "which node is responsible for key K?".
//! --------------
//! - [Ring](crate::dht::Ring) holds the modular arithmetic of an m-bit identifier space.
//! - [PeerRing](crate::dht::PeerRing) is the local routing state of one node: finger table, predecessor and key set.
//! - [ChordNode](crate::node::ChordNode) drives lookups, join and stabilization across nodes through RPCs.
//! - [PeerDirectory](crate::directory::PeerDirectory) is only used to bootstrap a join.
//!
//! # Join
//!
//! There are four phases when node N joins a ring which already has members.
//!
//! 1. Link
//! - N establishes a bidirectional link to every registered member of the directory.
//! 2. Seed the finger table
//! - N asks a contact for the successor of its own id, adopts the predecessor of that successor,
//!   and seeds the remaining fingers with lookups on the contact.
//! 3. Update others
//! - Every node which may have N in one of its fingers gets an `UpdateFingerTable` request,
//!   which propagates counter-clockwise while it improves the slot.
//! 4. Stabilize
//! - N runs one round of stabilization, then every member refreshes all its fingers.
//!
//! # MessagePayload
//!
//! Nodes never touch the state of each other. Every remote operation is a request message
//! wrapped in a [MessagePayload](crate::message::MessagePayload) with a transaction id.
//! The receiver answers with the matching report carrying the same transaction id,
//! and the caller waits on a one-shot channel until the report arrives or the deadline passes.
#![warn(missing_docs)]

pub mod consts;
pub mod directory;
pub mod dht;
pub mod error;
pub mod inspect;
pub mod measure;
pub mod message;
pub mod node;
pub mod storage;

#[cfg(test)]
mod tests;

pub use async_trait::async_trait;
pub use chord_transport;
