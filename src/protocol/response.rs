//! Response encoding.
//!
//! Every response type implements [`ResponseBody`]; [`encode_response`] adds the
//! correlation id header and the length prefix, so new API keys only need a new
//! body type.

use super::api::ApiDescriptor;
use super::codec::{frame_payload, put_compact_array, put_tag_buffer};
use super::error_code::ErrorCode;
use crate::error::Result;
use bytes::{BufMut, BytesMut};
use std::fmt::Debug;

/// A response that can serialize everything after its correlation id.
pub trait ResponseBody: Debug + Send + Sync {
    fn encode_body(&self, dst: &mut BytesMut) -> Result<()>;

    /// Top-level error code, for logging.
    fn error_code(&self) -> ErrorCode;
}

/// Boxed response produced by a handler or the dispatcher.
pub type Response = Box<dyn ResponseBody>;

/// Write response header (Kafka v0): correlation_id, no tagged fields.
fn write_response_header(dst: &mut BytesMut, correlation_id: i32) {
    dst.put_i32(correlation_id);
}

/// Serialize `body` for `correlation_id` and frame it.
///
/// The length prefix is computed from the finished payload.
pub fn encode_response(correlation_id: i32, body: &dyn ResponseBody) -> Result<BytesMut> {
    let mut payload = BytesMut::new();
    write_response_header(&mut payload, correlation_id);
    body.encode_body(&mut payload)?;
    frame_payload(&payload)
}

/// ApiVersions (key 18) response.
///
/// Layout: error_code, compact array of {api_key, min_version, max_version},
/// tag buffer, throttle_time_ms, tag buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersionsResponse {
    pub error_code: ErrorCode,
    pub api_keys: Vec<ApiDescriptor>,
    pub throttle_time_ms: i32,
}

impl ResponseBody for ApiVersionsResponse {
    fn encode_body(&self, dst: &mut BytesMut) -> Result<()> {
        dst.put_i16(self.error_code.code());
        put_compact_array(dst, &self.api_keys, |dst, api| {
            dst.put_i16(api.api_key);
            dst.put_i16(api.min_version);
            dst.put_i16(api.max_version);
        })?;
        put_tag_buffer(dst);
        dst.put_i32(self.throttle_time_ms);
        put_tag_buffer(dst);
        Ok(())
    }

    fn error_code(&self) -> ErrorCode {
        self.error_code
    }
}

/// Minimal error response: just the error code after the correlation id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error_code: ErrorCode,
}

impl ErrorResponse {
    pub fn new(error_code: ErrorCode) -> Self {
        Self { error_code }
    }
}

impl ResponseBody for ErrorResponse {
    fn encode_body(&self, dst: &mut BytesMut) -> Result<()> {
        dst.put_i16(self.error_code.code());
        Ok(())
    }

    fn error_code(&self) -> ErrorCode {
        self.error_code
    }
}
