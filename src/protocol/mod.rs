//! Kafka binary wire protocol front end.
//!
//! Frame: length (4 bytes BE) | api_key (2) | api_version (2) | correlation_id (4) | body.
//! Responses: length (4 bytes BE) | correlation_id (4) | API-specific body.

mod api;
mod codec;
mod dispatch;
mod error_code;
mod request;
mod response;

pub use api::{
    ApiDescriptor, ApiEntry, ApiHandler, ApiRegistry, ApiRegistryBuilder, ApiVersionsHandler,
    FnHandler, Resolution, API_API_VERSIONS, API_VERSIONS_MAX_VERSION,
};
pub use codec::{
    frame_payload, put_compact_array, put_compact_array_len, put_nullable_string,
    put_tag_buffer, read_frame, split_frame, WireReader, DEFAULT_MAX_FRAME_BYTES,
    LENGTH_PREFIX_BYTES, MAX_COMPACT_ARRAY_LEN,
};
pub use dispatch::Dispatcher;
pub use error_code::ErrorCode;
pub use request::{encode_request, parse_request, Request, RequestHeader, REQUEST_HEADER_BYTES};
pub use response::{encode_response, ApiVersionsResponse, ErrorResponse, Response, ResponseBody};
