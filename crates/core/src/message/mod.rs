//! Message and MessageHandler
mod payload;
pub use payload::MessagePayload;

mod pending;
pub use pending::PendingRequests;

pub mod types;
pub use types::*;

pub mod handlers;
pub use handlers::HandleMsg;
