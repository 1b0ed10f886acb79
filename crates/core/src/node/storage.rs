//! Key surface built on top of lookups. Keys are not replicated.
use crate::dht::Identifier;
use crate::dht::NodeRef;
use crate::error::Error;
use crate::error::Result;
use crate::message::Message;
use crate::message::SearchKeyReport;
use crate::message::SearchKeySend;
use crate::message::StoreKeyReport;
use crate::message::StoreKeySend;
use crate::node::ChordNode;

impl ChordNode {
    /// Store `key` on the node responsible for it. Returns that node.
    pub async fn put(&self, key: Identifier) -> Result<NodeRef> {
        self.ensure_joined()?;
        self.check_key(key)?;
        let owner = self.find_successor(key).await?;
        if self.is_self(&owner) {
            self.dht.store(key).await?;
        } else {
            let _: StoreKeyReport = self
                .transport
                .request(&owner, Message::StoreKeySend(StoreKeySend { key }))
                .await?;
        }
        tracing::debug!("key {} stored on node {}", key, owner);
        Ok(owner)
    }

    /// Search `key` on the node responsible for it. A miss is `None`.
    pub async fn get(&self, key: Identifier) -> Result<Option<Identifier>> {
        self.ensure_joined()?;
        self.check_key(key)?;
        let owner = self.find_successor(key).await?;
        if self.is_self(&owner) {
            return self.dht.search(key).await;
        }
        let report: SearchKeyReport = self
            .transport
            .request(&owner, Message::SearchKeySend(SearchKeySend { key }))
            .await?;
        Ok(report.found)
    }

    fn check_key(&self, key: Identifier) -> Result<()> {
        let ring = self.ring();
        if !ring.contains(key) {
            return Err(Error::IdentifierOutOfRange(key.value(), ring.size()));
        }
        Ok(())
    }
}
