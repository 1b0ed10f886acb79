use async_trait::async_trait;

use crate::error::Result;
use crate::message::types::Message;
use crate::message::types::SearchKeyReport;
use crate::message::types::SearchKeySend;
use crate::message::types::StoreKeyReport;
use crate::message::types::StoreKeySend;
use crate::message::HandleMsg;
use crate::message::MessagePayload;
use crate::node::ChordNode;

#[async_trait]
impl HandleMsg<StoreKeySend> for ChordNode {
    async fn handle(&self, ctx: &MessagePayload, msg: &StoreKeySend) -> Result<()> {
        self.dht.store(msg.key).await?;
        self.transport
            .send_report(
                ctx,
                Message::StoreKeyReport(StoreKeyReport { key: msg.key }),
            )
            .await
    }
}

#[async_trait]
impl HandleMsg<SearchKeySend> for ChordNode {
    async fn handle(&self, ctx: &MessagePayload, msg: &SearchKeySend) -> Result<()> {
        let found = self.dht.search(msg.key).await?;
        self.transport
            .send_report(ctx, Message::SearchKeyReport(SearchKeyReport { found }))
            .await
    }
}
