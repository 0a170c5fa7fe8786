//! Request header parsing.
//!
//! Payload layout (after the frame length): api_key (int16), api_version (int16),
//! correlation_id (int32), then the API-specific body.

use super::codec::{frame_payload, WireReader};
use crate::error::{BrokerWireError, Result};
use bytes::{BufMut, BytesMut};

/// Fixed header size: api_key + api_version + correlation_id.
pub const REQUEST_HEADER_BYTES: usize = 8;

/// Fixed request header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestHeader {
    pub api_key: i16,
    pub api_version: i16,
    pub correlation_id: i32,
}

impl RequestHeader {
    pub fn new(api_key: i16, api_version: i16, correlation_id: i32) -> Self {
        Self {
            api_key,
            api_version,
            correlation_id,
        }
    }

    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_i16(self.api_key);
        dst.put_i16(self.api_version);
        dst.put_i32(self.correlation_id);
    }
}

/// A parsed request. The body borrows from the frame payload; nothing is copied.
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    pub header: RequestHeader,
    pub body: &'a [u8],
}

impl<'a> Request<'a> {
    pub fn api_key(&self) -> i16 {
        self.header.api_key
    }

    pub fn api_version(&self) -> i16 {
        self.header.api_version
    }

    pub fn correlation_id(&self) -> i32 {
        self.header.correlation_id
    }

    /// Decode the v1 header's nullable client_id from the start of the body.
    ///
    /// Minimal clients send no client_id at all; an empty body reads as `None`.
    pub fn client_id(&self) -> Result<Option<&'a str>> {
        if self.body.is_empty() {
            return Ok(None);
        }
        WireReader::new(self.body).read_nullable_string()
    }
}

/// Parse a frame payload (length prefix already stripped) into a [`Request`].
///
/// Only the header is validated here; api_key and api_version are checked by the
/// dispatcher.
pub fn parse_request(payload: &[u8]) -> Result<Request<'_>> {
    if payload.len() < REQUEST_HEADER_BYTES {
        return Err(BrokerWireError::MalformedHeader {
            len: payload.len(),
        });
    }
    let mut src = WireReader::new(payload);
    let api_key = src.read_i16()?;
    let api_version = src.read_i16()?;
    let correlation_id = src.read_i32()?;
    Ok(Request {
        header: RequestHeader {
            api_key,
            api_version,
            correlation_id,
        },
        body: src.rest(),
    })
}

/// Build a complete request frame (length prefix, header, body).
pub fn encode_request(header: &RequestHeader, body: &[u8]) -> Result<BytesMut> {
    let mut payload = BytesMut::with_capacity(REQUEST_HEADER_BYTES + body.len());
    header.encode(&mut payload);
    payload.extend_from_slice(body);
    frame_payload(&payload)
}
