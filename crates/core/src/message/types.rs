//! Wire messages exchanged between nodes. Every request `XxxSend` is answered by `XxxReport`.
#![warn(missing_docs)]
use serde::Deserialize;
use serde::Serialize;

use crate::dht::Identifier;
use crate::dht::NodeRef;
use crate::dht::TopoInfo;

/// MessageType use to ask a node for the successor of `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FindSuccessorSend {
    /// target identifier
    pub id: Identifier,
}

/// MessageType report the successor found by [FindSuccessorSend].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FindSuccessorReport {
    /// successor of the target identifier
    pub node: NodeRef,
}

/// MessageType use to ask a node for the predecessor of `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FindPredecessorSend {
    /// target identifier
    pub id: Identifier,
}

/// MessageType report the predecessor found by [FindPredecessorSend].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FindPredecessorReport {
    /// predecessor of the target identifier
    pub node: NodeRef,
}

/// MessageType use to ask a node for its closest preceding finger of `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FindClosestPrecedingFingerSend {
    /// target identifier
    pub id: Identifier,
}

/// MessageType report the finger found by [FindClosestPrecedingFingerSend].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FindClosestPrecedingFingerReport {
    /// closest preceding finger, the remote node itself when there is none
    pub node: NodeRef,
}

/// MessageType use to ask a node for its successor and predecessor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryForTopoInfoSend;

/// MessageType report the topology of a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryForTopoInfoReport {
    /// successor and predecessor
    pub info: TopoInfo,
}

/// MessageType tell a node that `node` may be its predecessor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotifyPredecessorSend {
    /// candidate predecessor
    pub node: NodeRef,
}

/// MessageType report the predecessor after [NotifyPredecessorSend] is handled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotifyPredecessorReport {
    /// predecessor after updating
    pub node: NodeRef,
}

/// MessageType ask a node to install `node` at finger `index` if it improves the slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateFingerTableSend {
    /// the new node
    pub node: NodeRef,
    /// finger index
    pub index: u32,
    /// remaining hops the update may still propagate
    pub ttl: u32,
}

/// MessageType report whether [UpdateFingerTableSend] changed the table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateFingerTableReport {
    /// whether the slot was improved
    pub updated: bool,
}

/// MessageType ask a node to recompute all its fingers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixFingersSend;

/// MessageType report [FixFingersSend] is done.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixFingersReport;

/// MessageType ask the owner of `key` to store it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreKeySend {
    /// key to store
    pub key: Identifier,
}

/// MessageType report [StoreKeySend] is done.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreKeyReport {
    /// stored key
    pub key: Identifier,
}

/// MessageType ask the owner of `key` whether it holds the key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchKeySend {
    /// key to search
    pub key: Identifier,
}

/// MessageType report the result of [SearchKeySend].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchKeyReport {
    /// the key if present
    pub found: Option<Identifier>,
}

/// A collection MessageType
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, strum::IntoStaticStr)]
#[non_exhaustive]
pub enum Message {
    /// Remote find_successor
    FindSuccessorSend(FindSuccessorSend),
    /// Response of FindSuccessorSend
    FindSuccessorReport(FindSuccessorReport),
    /// Remote find_predecessor
    FindPredecessorSend(FindPredecessorSend),
    /// Response of FindPredecessorSend
    FindPredecessorReport(FindPredecessorReport),
    /// Remote closest_preceding_finger
    FindClosestPrecedingFingerSend(FindClosestPrecedingFingerSend),
    /// Response of FindClosestPrecedingFingerSend
    FindClosestPrecedingFingerReport(FindClosestPrecedingFingerReport),
    /// Query successor and predecessor
    QueryForTopoInfoSend(QueryForTopoInfoSend),
    /// Response of QueryForTopoInfoSend
    QueryForTopoInfoReport(QueryForTopoInfoReport),
    /// Remote notify
    NotifyPredecessorSend(NotifyPredecessorSend),
    /// Response of NotifyPredecessorSend
    NotifyPredecessorReport(NotifyPredecessorReport),
    /// Remote update_finger_table
    UpdateFingerTableSend(UpdateFingerTableSend),
    /// Response of UpdateFingerTableSend
    UpdateFingerTableReport(UpdateFingerTableReport),
    /// Remote fix_fingers
    FixFingersSend(FixFingersSend),
    /// Response of FixFingersSend
    FixFingersReport(FixFingersReport),
    /// Store a key on its owner
    StoreKeySend(StoreKeySend),
    /// Response of StoreKeySend
    StoreKeyReport(StoreKeyReport),
    /// Search a key on its owner
    SearchKeySend(SearchKeySend),
    /// Response of SearchKeySend
    SearchKeyReport(SearchKeyReport),
}

impl Message {
    /// Name of the variant, used in logs and errors.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Whether the message answers a request.
    pub fn is_report(&self) -> bool {
        matches!(
            self,
            Message::FindSuccessorReport(_)
                | Message::FindPredecessorReport(_)
                | Message::FindClosestPrecedingFingerReport(_)
                | Message::QueryForTopoInfoReport(_)
                | Message::NotifyPredecessorReport(_)
                | Message::UpdateFingerTableReport(_)
                | Message::FixFingersReport(_)
                | Message::StoreKeyReport(_)
                | Message::SearchKeyReport(_)
        )
    }
}

/// Declare how to pull a typed report out of a [Message].
pub trait Report: Sized {
    /// Name of the expected variant.
    const NAME: &'static str;

    /// Take the report if the message is of the expected variant.
    fn from_message(msg: Message) -> Option<Self>;
}

macro_rules! impl_report {
    ($($ty:ident),*) => {
        $(
            impl Report for $ty {
                const NAME: &'static str = stringify!($ty);

                fn from_message(msg: Message) -> Option<Self> {
                    match msg {
                        Message::$ty(report) => Some(report),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_report!(
    FindSuccessorReport,
    FindPredecessorReport,
    FindClosestPrecedingFingerReport,
    QueryForTopoInfoReport,
    NotifyPredecessorReport,
    UpdateFingerTableReport,
    FixFingersReport,
    StoreKeyReport,
    SearchKeyReport
);
