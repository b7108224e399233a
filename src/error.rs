//! Error types for the RTP mirroring pipeline

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Packet error: {0}")]
    Packet(#[from] PacketError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Transport socket errors
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Invalid destination address: {0}")]
    InvalidAddress(String),

    #[error("Socket bind failed: {0}")]
    BindFailed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Socket is closed")]
    Closed,
}

/// RTP packet parse errors
#[derive(Error, Debug)]
pub enum PacketError {
    #[error("Packet too short: {0} bytes")]
    TooShort(usize),

    #[error("Unsupported RTP version: {0}")]
    UnsupportedVersion(u8),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid target, expected IP:PORT: {0}")]
    InvalidTarget(String),

    #[error("Target port must be non-zero")]
    ZeroPort,

    #[error("Failed to parse config: {0}")]
    Parse(String),
}

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, Error>;
