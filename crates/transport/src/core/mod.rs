//! The main concepts of this mod are:
//!
//! The [TransportInterface](transport::TransportInterface) trait should be
//! implemented for each message substrate. It registers endpoints, links them
//! and delivers opaque messages between them. See the [transport] module.
//!
//! The [TransportCallback](callback::TransportCallback) trait is used to let user handle
//! the messages arriving at an endpoint. See the [callback] module.

pub mod callback;
pub mod transport;
