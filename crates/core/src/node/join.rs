//! Join protocol.
use crate::dht::Identifier;
use crate::dht::NodeRef;
use crate::error::Error;
use crate::error::Result;
use crate::node::ChordNode;

impl ChordNode {
    /// Make this node a member of the ring of its directory.
    ///
    /// The first node of a directory builds a ring of itself. Any other node seeds its
    /// finger table from a contact, tells the nodes which should point to it, stabilizes,
    /// then asks every member to refresh its fingers before it registers.
    pub async fn join(&self) -> Result<()> {
        if self.is_joined() {
            return Ok(());
        }
        if self.directory.lookup(self.id()).is_some() {
            return Err(Error::DuplicateIdentifier(self.id().value()));
        }
        let Some(contact) = self.directory.any_other_member(self.id()) else {
            self.dht.create()?;
            self.directory.register(self.node_ref());
            self.set_joined(true);
            tracing::info!("node {} created a new ring", self.id());
            return Ok(());
        };

        let members = self.directory.members();
        for member in members.iter() {
            self.transport.connect(member)?;
        }
        tracing::info!("node {} joining via {}", self.id(), contact);

        if let Err(e) = self.init_finger_table(&contact).await {
            tracing::warn!("node {} failed to join via {}: {}", self.id(), contact, e);
            self.dht.reset()?;
            return Err(Error::JoinAborted(Box::new(e)));
        }
        self.update_other_nodes(members.len()).await?;
        self.stabilize().await?;
        self.fix_fingers().await?;
        for member in members.iter() {
            self.remote_fix_fingers(member).await?;
        }

        self.directory.register(self.node_ref());
        self.set_joined(true);
        tracing::info!("node {} joined the ring", self.id());
        Ok(())
    }

    /// Seed the finger table through lookups walked from `contact`, then make the
    /// successor adopt this node as its predecessor and the old predecessor point its
    /// successor to this node.
    ///
    /// Every lookup completes before the first remote change, so a failed seed leaves
    /// the ring as it was.
    async fn init_finger_table(&self, contact: &NodeRef) -> Result<()> {
        let ring = self.ring();
        let successor = self.seed_successor(contact, self.id()).await?;
        if successor.id == self.id() {
            return Err(Error::DuplicateIdentifier(self.id().value()));
        }
        self.dht.set_finger(0, successor.clone())?;

        let predecessor = self
            .remote_topo_info(&successor)
            .await?
            .predecessor
            .unwrap_or_else(|| successor.clone());

        for i in 0..(ring.bits() as usize).saturating_sub(1) {
            let (start, prev) = {
                let finger = self.dht.lock_finger()?;
                (finger[i + 1].start, finger[i].node.clone())
            };
            let node = if ring.between(start, self.id(), prev.id, true, false) {
                prev
            } else {
                self.seed_successor(contact, start).await?
            };
            self.dht.set_finger(i + 1, node)?;
        }
        tracing::debug!("node {} seeded its finger table", self.id());

        self.dht.set_predecessor(Some(predecessor.clone()))?;
        self.remote_notify(&successor, self.node_ref()).await?;
        self.remote_update_finger_table(&predecessor, self.node_ref(), 0, 0)
            .await?;
        Ok(())
    }

    /// Successor of `id` walked from `contact` by this node, one hop per request.
    async fn seed_successor(&self, contact: &NodeRef, id: Identifier) -> Result<NodeRef> {
        self.walk(contact.clone(), id)
            .await
            .map(|(_, successor)| successor)
    }

    /// Tell every node whose finger `i` may now be this node.
    async fn update_other_nodes(&self, members: usize) -> Result<()> {
        let ring = self.ring();
        let ttl = members as u32 + 1;
        for i in 0..ring.bits() as usize {
            let target = ring.sub(self.id(), ring.power(i));
            let p = self.lookup_predecessor(target).await?;
            if self.is_self(&p) {
                continue;
            }
            self.remote_update_finger_table(&p, self.node_ref(), i, ttl)
                .await?;
        }
        Ok(())
    }
}
