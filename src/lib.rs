//! brokerwire: Kafka wire protocol front end.
//!
//! Decodes length-prefixed requests, negotiates API versions against a
//! registry built at startup, and encodes framed responses.

pub mod config;
pub mod error;
pub mod protocol;
pub mod server;

pub use config::ServerConfig;
pub use error::{BrokerWireError, Result};
pub use protocol::{
    ApiDescriptor, ApiHandler, ApiRegistry, ApiVersionsResponse, Dispatcher, ErrorCode,
    ErrorResponse, Request, RequestHeader, Response, ResponseBody,
};
