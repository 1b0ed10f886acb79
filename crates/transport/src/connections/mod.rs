//! Message substrates implementing [TransportInterface](crate::core::transport::TransportInterface).
//!
//! Only an in-memory substrate is provided. It is used by simulations and tests.

mod memory;

pub use crate::connections::memory::MemoryTransport;
