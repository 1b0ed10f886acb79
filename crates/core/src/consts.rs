//! Constant variables.

/// Default bit width of the identifier space.
pub const DEFAULT_RING_BITS: u8 = 10;
/// The widest identifier space supported, identifiers are stored in `u64`.
pub const MAX_RING_BITS: u8 = 63;
/// Default deadline of a remote call in ms.
pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 100;
/// Default number of retries against the same target after a timeout.
pub const DEFAULT_RPC_RETRIES: u8 = 0;
/// Upper bound of the hops a single lookup walk may take.
pub const MAX_LOOKUP_HOPS: u64 = 1024;
/// Scheme prefix of addresses derived from an identifier.
pub const MEMORY_ADDRESS_PREFIX: &str = "mem://";
