//! API registry: supported version ranges and handlers per api key.
//!
//! The registry is built once at startup and is read-only afterwards; connection
//! tasks share it behind an `Arc`.

use super::codec::MAX_COMPACT_ARRAY_LEN;
use super::error_code::ErrorCode;
use super::request::Request;
use super::response::{ApiVersionsResponse, ErrorResponse, Response};
use crate::error::{BrokerWireError, Result};
use std::collections::BTreeMap;
use std::fmt;

pub const API_API_VERSIONS: i16 = 18;

/// Highest ApiVersions version served by the built-in handler.
pub const API_VERSIONS_MAX_VERSION: i16 = 4;

/// Supported version range for one api key. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiDescriptor {
    pub api_key: i16,
    pub min_version: i16,
    pub max_version: i16,
}

impl ApiDescriptor {
    pub fn new(api_key: i16, min_version: i16, max_version: i16) -> Self {
        Self {
            api_key,
            min_version,
            max_version,
        }
    }

    pub fn supports_version(&self, version: i16) -> bool {
        version >= self.min_version && version <= self.max_version
    }
}

/// Handler for one api key.
pub trait ApiHandler: Send + Sync + 'static {
    /// Serve a request whose version is already known to be supported.
    fn handle(&self, request: &Request<'_>, registry: &ApiRegistry) -> Result<Response>;

    /// Response sent instead of calling `handle` when the version is out of range.
    fn reject(&self, _registry: &ApiRegistry, error_code: ErrorCode) -> Response {
        Box::new(ErrorResponse::new(error_code))
    }
}

/// Adapts a plain function or closure into an [`ApiHandler`].
pub struct FnHandler<F>(pub F);

impl<F> ApiHandler for FnHandler<F>
where
    F: Fn(&Request<'_>, &ApiRegistry) -> Result<Response> + Send + Sync + 'static,
{
    fn handle(&self, request: &Request<'_>, registry: &ApiRegistry) -> Result<Response> {
        (self.0)(request, registry)
    }
}

/// Built-in ApiVersions handler: lists every registered api, itself included.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApiVersionsHandler;

impl ApiVersionsHandler {
    fn listing(registry: &ApiRegistry, error_code: ErrorCode) -> ApiVersionsResponse {
        ApiVersionsResponse {
            error_code,
            api_keys: registry.descriptors(),
            throttle_time_ms: 0,
        }
    }
}

impl ApiHandler for ApiVersionsHandler {
    fn handle(&self, _request: &Request<'_>, registry: &ApiRegistry) -> Result<Response> {
        Ok(Box::new(Self::listing(registry, ErrorCode::None)))
    }

    // Clients retry with a version from the listing, so keep it on rejection.
    fn reject(&self, registry: &ApiRegistry, error_code: ErrorCode) -> Response {
        Box::new(Self::listing(registry, error_code))
    }
}

/// A registered api: its version range and handler.
pub struct ApiEntry {
    descriptor: ApiDescriptor,
    handler: Box<dyn ApiHandler>,
}

impl ApiEntry {
    pub fn descriptor(&self) -> &ApiDescriptor {
        &self.descriptor
    }

    pub fn handler(&self) -> &dyn ApiHandler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for ApiEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiEntry")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Outcome of looking up (api_key, api_version).
#[derive(Debug)]
pub enum Resolution<'r> {
    Supported(&'r ApiEntry),
    UnsupportedVersion(&'r ApiEntry),
    UnknownApiKey,
}

/// Immutable map from api key to descriptor and handler.
#[derive(Debug)]
pub struct ApiRegistry {
    entries: BTreeMap<i16, ApiEntry>,
}

impl ApiRegistry {
    pub fn builder() -> ApiRegistryBuilder {
        ApiRegistryBuilder::default()
    }

    /// Builder preloaded with the ApiVersions handler (versions 0 to 4).
    pub fn with_api_versions() -> ApiRegistryBuilder {
        Self::builder().register(
            ApiDescriptor::new(API_API_VERSIONS, 0, API_VERSIONS_MAX_VERSION),
            ApiVersionsHandler,
        )
    }

    pub fn resolve(&self, api_key: i16, api_version: i16) -> Resolution<'_> {
        match self.entries.get(&api_key) {
            None => Resolution::UnknownApiKey,
            Some(entry) if entry.descriptor.supports_version(api_version) => {
                Resolution::Supported(entry)
            }
            Some(entry) => Resolution::UnsupportedVersion(entry),
        }
    }

    /// All registered descriptors, sorted by api key.
    pub fn descriptors(&self) -> Vec<ApiDescriptor> {
        self.entries.values().map(|e| e.descriptor).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects registrations; [`ApiRegistryBuilder::build`] validates them.
#[derive(Default)]
pub struct ApiRegistryBuilder {
    entries: Vec<ApiEntry>,
}

impl ApiRegistryBuilder {
    pub fn register(mut self, descriptor: ApiDescriptor, handler: impl ApiHandler) -> Self {
        self.entries.push(ApiEntry {
            descriptor,
            handler: Box::new(handler),
        });
        self
    }

    /// Register a closure as the handler for `descriptor`.
    pub fn register_fn<F>(self, descriptor: ApiDescriptor, handler: F) -> Self
    where
        F: Fn(&Request<'_>, &ApiRegistry) -> Result<Response> + Send + Sync + 'static,
    {
        self.register(descriptor, FnHandler(handler))
    }

    /// Reject duplicate api keys, inverted version ranges, and more apis than
    /// the ApiVersions listing can carry.
    pub fn build(self) -> Result<ApiRegistry> {
        if self.entries.len() > MAX_COMPACT_ARRAY_LEN {
            return Err(BrokerWireError::Config(format!(
                "{} apis registered, ApiVersions can list at most {}",
                self.entries.len(),
                MAX_COMPACT_ARRAY_LEN
            )));
        }
        let mut entries = BTreeMap::new();
        for entry in self.entries {
            let d = entry.descriptor;
            if d.min_version > d.max_version {
                return Err(BrokerWireError::Config(format!(
                    "api key {}: min version {} above max version {}",
                    d.api_key, d.min_version, d.max_version
                )));
            }
            if entries.insert(d.api_key, entry).is_some() {
                return Err(BrokerWireError::Config(format!(
                    "api key {} registered twice",
                    d.api_key
                )));
            }
        }
        Ok(ApiRegistry { entries })
    }
}
