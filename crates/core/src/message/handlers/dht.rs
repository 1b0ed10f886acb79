use async_trait::async_trait;

use crate::error::Result;
use crate::message::types::FindClosestPrecedingFingerReport;
use crate::message::types::FindClosestPrecedingFingerSend;
use crate::message::types::FindPredecessorReport;
use crate::message::types::FindPredecessorSend;
use crate::message::types::FindSuccessorReport;
use crate::message::types::FindSuccessorSend;
use crate::message::types::Message;
use crate::message::types::QueryForTopoInfoReport;
use crate::message::types::QueryForTopoInfoSend;
use crate::message::HandleMsg;
use crate::message::MessagePayload;
use crate::node::ChordNode;

#[async_trait]
impl HandleMsg<FindSuccessorSend> for ChordNode {
    async fn handle(&self, ctx: &MessagePayload, msg: &FindSuccessorSend) -> Result<()> {
        let node = self.lookup_successor(msg.id).await?;
        self.transport
            .send_report(
                ctx,
                Message::FindSuccessorReport(FindSuccessorReport { node }),
            )
            .await
    }
}

#[async_trait]
impl HandleMsg<FindPredecessorSend> for ChordNode {
    async fn handle(&self, ctx: &MessagePayload, msg: &FindPredecessorSend) -> Result<()> {
        let node = self.lookup_predecessor(msg.id).await?;
        self.transport
            .send_report(
                ctx,
                Message::FindPredecessorReport(FindPredecessorReport { node }),
            )
            .await
    }
}

#[async_trait]
impl HandleMsg<FindClosestPrecedingFingerSend> for ChordNode {
    async fn handle(
        &self,
        ctx: &MessagePayload,
        msg: &FindClosestPrecedingFingerSend,
    ) -> Result<()> {
        let node = self.closest_preceding_finger(msg.id)?;
        self.transport
            .send_report(
                ctx,
                Message::FindClosestPrecedingFingerReport(FindClosestPrecedingFingerReport {
                    node,
                }),
            )
            .await
    }
}

#[async_trait]
impl HandleMsg<QueryForTopoInfoSend> for ChordNode {
    async fn handle(&self, ctx: &MessagePayload, _msg: &QueryForTopoInfoSend) -> Result<()> {
        let info = self.dht.topo_info()?;
        self.transport
            .send_report(
                ctx,
                Message::QueryForTopoInfoReport(QueryForTopoInfoReport { info }),
            )
            .await
    }
}
