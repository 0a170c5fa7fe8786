//! Server configuration.

use crate::error::{BrokerWireError, Result};
use crate::protocol::DEFAULT_MAX_FRAME_BYTES;
use std::time::Duration;

pub const DEFAULT_ADDR: &str = "0.0.0.0:9092";

/// Time allowed to receive each whole frame, prefix and payload.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(300);

/// Listener and per-connection limits.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address to bind, e.g. `0.0.0.0:9092`.
    pub addr: String,
    /// Largest accepted frame payload; larger claims close the connection.
    pub max_frame_bytes: usize,
    /// Close connections that take longer than this to deliver a complete frame,
    /// counted from the start of the read. `None` waits forever.
    pub read_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by BROKERWIRE_ADDR, BROKERWIRE_MAX_FRAME_BYTES and
    /// BROKERWIRE_READ_TIMEOUT_MS (0 disables the timeout).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(addr) = lookup("BROKERWIRE_ADDR") {
            config.addr = addr;
        }
        if let Some(raw) = lookup("BROKERWIRE_MAX_FRAME_BYTES") {
            let max: usize = parse_var("BROKERWIRE_MAX_FRAME_BYTES", &raw)?;
            if max == 0 {
                return Err(BrokerWireError::Config(
                    "BROKERWIRE_MAX_FRAME_BYTES must be positive".into(),
                ));
            }
            config.max_frame_bytes = max;
        }
        if let Some(raw) = lookup("BROKERWIRE_READ_TIMEOUT_MS") {
            let ms: u64 = parse_var("BROKERWIRE_READ_TIMEOUT_MS", &raw)?;
            config.read_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| BrokerWireError::Config(format!("{}={:?}: {}", key, raw, e)))
}
