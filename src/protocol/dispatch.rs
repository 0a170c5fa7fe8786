//! Dispatch parsed requests to registered handlers and frame the result.

use super::api::{ApiRegistry, Resolution};
use super::codec::split_frame;
use super::error_code::ErrorCode;
use super::request::{parse_request, Request};
use super::response::{encode_response, ErrorResponse, Response};
use crate::error::Result;
use bytes::BytesMut;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Routes requests through a shared, read-only [`ApiRegistry`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ApiRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ApiRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ApiRegistry {
        &self.registry
    }

    /// Produce the response for one request. Never fails: negotiation outcomes
    /// and handler failures both come back as error codes.
    pub fn dispatch(&self, request: &Request<'_>) -> Response {
        let api_key = request.api_key();
        let version = request.api_version();
        match self.registry.resolve(api_key, version) {
            Resolution::Supported(entry) => {
                match entry.handler().handle(request, &self.registry) {
                    Ok(resp) => resp,
                    Err(e) => {
                        error!(api_key, version, "handler error: {}", e);
                        Box::new(ErrorResponse::new(ErrorCode::UnknownServerError))
                    }
                }
            }
            Resolution::UnsupportedVersion(entry) => {
                let d = entry.descriptor();
                debug!(
                    api_key,
                    version,
                    min_version = d.min_version,
                    max_version = d.max_version,
                    "unsupported version"
                );
                entry
                    .handler()
                    .reject(&self.registry, ErrorCode::UnsupportedVersion)
            }
            Resolution::UnknownApiKey => {
                warn!(api_key, version, "unknown api key");
                Box::new(ErrorResponse::new(ErrorCode::UnsupportedVersion))
            }
        }
    }

    /// Parse a frame payload (prefix stripped), dispatch it and return the framed response.
    pub fn respond(&self, payload: &[u8]) -> Result<BytesMut> {
        let request = parse_request(payload)?;
        let response = self.dispatch(&request);
        debug!(
            api_key = request.api_key(),
            version = request.api_version(),
            correlation_id = request.correlation_id(),
            error_code = %response.error_code(),
            "request"
        );
        encode_response(request.correlation_id(), response.as_ref())
    }

    /// Like [`Dispatcher::respond`], starting from a whole frame including its prefix.
    pub fn respond_to_frame(&self, frame: &[u8]) -> Result<BytesMut> {
        self.respond(split_frame(frame)?)
    }
}
