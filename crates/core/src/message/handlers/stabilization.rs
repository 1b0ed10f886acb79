use async_trait::async_trait;

use crate::error::Result;
use crate::message::types::FixFingersReport;
use crate::message::types::FixFingersSend;
use crate::message::types::Message;
use crate::message::types::NotifyPredecessorReport;
use crate::message::types::NotifyPredecessorSend;
use crate::message::types::UpdateFingerTableReport;
use crate::message::types::UpdateFingerTableSend;
use crate::message::HandleMsg;
use crate::message::MessagePayload;
use crate::node::ChordNode;

#[async_trait]
impl HandleMsg<NotifyPredecessorSend> for ChordNode {
    async fn handle(&self, ctx: &MessagePayload, msg: &NotifyPredecessorSend) -> Result<()> {
        let node = self.notify(msg.node.clone())?;
        self.transport
            .send_report(
                ctx,
                Message::NotifyPredecessorReport(NotifyPredecessorReport { node }),
            )
            .await
    }
}

#[async_trait]
impl HandleMsg<UpdateFingerTableSend> for ChordNode {
    async fn handle(&self, ctx: &MessagePayload, msg: &UpdateFingerTableSend) -> Result<()> {
        let updated = self
            .update_finger_table(msg.node.clone(), msg.index as usize, msg.ttl)
            .await?;
        self.transport
            .send_report(
                ctx,
                Message::UpdateFingerTableReport(UpdateFingerTableReport { updated }),
            )
            .await
    }
}

#[async_trait]
impl HandleMsg<FixFingersSend> for ChordNode {
    async fn handle(&self, ctx: &MessagePayload, _msg: &FixFingersSend) -> Result<()> {
        self.fix_fingers().await?;
        self.transport
            .send_report(ctx, Message::FixFingersReport(FixFingersReport))
            .await
    }
}
