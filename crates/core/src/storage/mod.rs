//! Module of MemStorage, the local key set of a node.

pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
pub use crate::storage::memory::MemStorage;

/// Key value storage interface
#[async_trait]
pub trait KvStorageInterface<K, V> {
    /// Get an entry by `key`.
    async fn get(&self, key: &K) -> Result<Option<V>>;

    /// Put `value` under `key`, overwriting the old one.
    async fn put(&self, key: &K, value: &V) -> Result<()>;

    /// All entries sorted by key.
    async fn get_all(&self) -> Result<Vec<(K, V)>>;
}
