use std::hash::Hash;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::Result;
use crate::storage::KvStorageInterface;

#[derive(Debug, Default)]
pub struct MemStorage<K, V>
where K: Eq + Hash
{
    table: DashMap<K, V>,
}

impl<K, V> MemStorage<K, V>
where K: Eq + Hash
{
    pub fn new() -> Self {
        Self {
            table: DashMap::default(),
        }
    }
}

#[async_trait]
impl<K, V> KvStorageInterface<K, V> for MemStorage<K, V>
where
    K: Eq + Hash + Ord + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn get(&self, key: &K) -> Result<Option<V>> {
        Ok(self.table.get(key).map(|v| v.value().clone()))
    }

    async fn put(&self, key: &K, value: &V) -> Result<()> {
        self.table.insert(key.clone(), value.clone());
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<(K, V)>> {
        let mut entries: Vec<(K, V)> = self
            .table
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dht::Identifier;

    #[tokio::test]
    async fn memstorage_basic_interface_should_work() {
        let store = MemStorage::<Identifier, String>::new();
        let key = Identifier::new(42);

        assert_eq!(store.get(&key).await.unwrap(), None);

        store.put(&key, &"value 1".to_string()).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), Some("value 1".into()));

        store.put(&key, &"value 2".to_string()).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), Some("value 2".into()));
        assert_eq!(store.get_all().await.unwrap().len(), 1);

        store.put(&Identifier::new(7), &"value 3".to_string()).await.unwrap();
        let keys: Vec<u64> = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|(k, _)| k.value())
            .collect();
        assert_eq!(keys, vec![7, 42]);
    }
}
