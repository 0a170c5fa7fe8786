//! Error types for the protocol front end.

use std::time::Duration;
use thiserror::Error;

/// Result alias for protocol and server operations.
pub type Result<T> = std::result::Result<T, BrokerWireError>;

/// Errors raised while framing, parsing or serving requests.
///
/// Protocol-level outcomes such as an unsupported version are not errors:
/// they travel as an [`ErrorCode`](crate::protocol::ErrorCode) inside a
/// well-formed response.
#[derive(Error, Debug)]
pub enum BrokerWireError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Truncated frame: needed {needed} bytes, {available} available")]
    TruncatedFrame { needed: usize, available: usize },

    #[error("Malformed request header: {len} bytes, need at least 8")]
    MalformedHeader { len: usize },

    #[error("Frame too large: {len} bytes exceeds limit of {max}")]
    FrameTooLarge { len: usize, max: usize },

    #[error("Read timed out after {0:?}")]
    Timeout(Duration),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl BrokerWireError {
    /// True for errors caused by the peer's bytes rather than the transport.
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            Self::TruncatedFrame { .. }
                | Self::MalformedHeader { .. }
                | Self::FrameTooLarge { .. }
                | Self::Protocol(_)
        )
    }
}
