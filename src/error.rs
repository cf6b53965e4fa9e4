use std::net::SocketAddr;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Receive error: {0}")]
    Receive(#[source] std::io::Error),

    #[error("Virtual controller unavailable: {0}")]
    ControllerUnavailable(String),

    #[error("Publish to virtual controller failed: {0}")]
    Publish(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Platform not supported: {0}")]
    PlatformNotSupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
