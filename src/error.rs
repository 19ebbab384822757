use std::net::SocketAddr;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResponderError>;

#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
