#![allow(missing_docs)]

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("Endpoint {0} already registered")]
    EndpointAlreadyExists(String),

    #[error("Endpoint {0} not found, should register first")]
    EndpointNotFound(String),

    #[error("Connection {0} -> {1} not found, should connect first")]
    ConnectionNotFound(String, String),

    #[error("You should not connect to yourself: {0}")]
    ShouldNotConnectSelf(String),
}
