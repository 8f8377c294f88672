// Webservice capability and the generic status-backed resource
//
// Resources are identified by path alone: two handles with the same path are
// the same resource as far as any path-indexed container is concerned,
// whatever their current status.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::SocketAddr;
use std::sync::Arc;

use statuscache_core::ClockSource;
use statuscache_crypto::EntityTag;
use statuscache_error::{ResourceResult, UnsupportedFormat};
use tracing::debug;

use crate::content_format::ContentFormat;
use crate::message::{Method, Request, Response, ResponseCode};
use crate::snapshot::StatusSnapshot;
use crate::store::{ResourceStatusStore, StatusCodec};

/// Capabilities a resource exposes to the dispatch layer
pub trait Webservice: Send + Sync {
    /// Path the resource is served at; fixed at construction
    fn path(&self) -> &str;

    /// Answer a request.
    ///
    /// Errors are translated by [`dispatch`](crate::dispatch::dispatch) into
    /// 4.06 or 5.00 responses.
    fn handle_request(&self, request: &Request, remote: SocketAddr) -> ResourceResult<Response>;

    /// Current status rendered in `format`
    fn serialize_status(&self, format: ContentFormat) -> Result<Vec<u8>, UnsupportedFormat>;

    /// Entity tag of the current status for `format`
    fn entity_tag(&self, format: ContentFormat) -> EntityTag;

    /// Release anything held by the resource
    fn shutdown(&self) {}
}

/// The key under which a resource is stored in path-indexed containers
pub fn path_key(resource: &dyn Webservice) -> &str {
    resource.path()
}

/// Shared handle to a resource that compares and hashes by path only
#[derive(Clone)]
pub struct ResourceHandle(Arc<dyn Webservice>);

impl ResourceHandle {
    pub fn new(resource: Arc<dyn Webservice>) -> Self {
        Self(resource)
    }

    pub fn path(&self) -> &str {
        path_key(self.0.as_ref())
    }

    pub fn resource(&self) -> &Arc<dyn Webservice> {
        &self.0
    }
}

impl From<Arc<dyn Webservice>> for ResourceHandle {
    fn from(resource: Arc<dyn Webservice>) -> Self {
        Self(resource)
    }
}

impl PartialEq for ResourceHandle {
    fn eq(&self, other: &Self) -> bool {
        self.path() == other.path()
    }
}

impl Eq for ResourceHandle {}

impl PartialEq<str> for ResourceHandle {
    fn eq(&self, other: &str) -> bool {
        self.path() == other
    }
}

impl PartialEq<&str> for ResourceHandle {
    fn eq(&self, other: &&str) -> bool {
        self.path() == *other
    }
}

impl PartialEq<String> for ResourceHandle {
    fn eq(&self, other: &String) -> bool {
        self.path() == other.as_str()
    }
}

// Must agree with `str`'s Hash for the `Borrow<str>` lookups.
impl Hash for ResourceHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path().hash(state);
    }
}

impl Borrow<str> for ResourceHandle {
    fn borrow(&self) -> &str {
        self.path()
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResourceHandle").field(&self.path()).finish()
    }
}

/// A read-only resource whose status lives in a [`ResourceStatusStore`].
///
/// GET is answered with the status in the Accept format, or in the default
/// format when the request names none. Every other method gets 4.05.
pub struct StatusResource<T, C> {
    store: ResourceStatusStore<T, C>,
    default_format: ContentFormat,
}

impl<T, C> StatusResource<T, C>
where
    T: Send + Sync,
    C: StatusCodec<T>,
{
    pub fn new(
        path: impl Into<String>,
        initial: T,
        lifetime_seconds: u64,
        codec: C,
        default_format: ContentFormat,
    ) -> Self {
        Self {
            store: ResourceStatusStore::new(path, initial, lifetime_seconds, codec),
            default_format,
        }
    }

    pub fn with_clock(
        path: impl Into<String>,
        initial: T,
        lifetime_seconds: u64,
        codec: C,
        default_format: ContentFormat,
        clock: Arc<dyn ClockSource>,
    ) -> Self {
        Self {
            store: ResourceStatusStore::with_clock(path, initial, lifetime_seconds, codec, clock),
            default_format,
        }
    }

    /// The one way to change the status
    pub fn set_status(&self, value: T, lifetime_seconds: u64) {
        self.store.set(value, lifetime_seconds);
    }

    pub fn status(&self) -> Arc<T> {
        self.store.current_value()
    }

    pub fn snapshot(&self, format: ContentFormat) -> Result<StatusSnapshot, UnsupportedFormat> {
        self.store.get(format)
    }

    pub fn max_age(&self) -> u64 {
        self.store.max_age()
    }

    pub fn default_format(&self) -> ContentFormat {
        self.default_format
    }

    pub fn store(&self) -> &ResourceStatusStore<T, C> {
        &self.store
    }

    /// 2.05 response for a read of the current status
    pub fn respond(&self, request: &Request) -> Result<Response, UnsupportedFormat> {
        let format = request.accept.unwrap_or(self.default_format);
        self.store.get(format).map(Response::from_snapshot)
    }

    /// 4.05 response with the explanatory body
    pub fn method_not_allowed(&self) -> Response {
        let message = format!("Service \"{}\" only allows GET requests.", self.store.path());
        Response::with_message(ResponseCode::MethodNotAllowed, message)
    }
}

impl<T, C> Webservice for StatusResource<T, C>
where
    T: Send + Sync,
    C: StatusCodec<T>,
{
    fn path(&self) -> &str {
        self.store.path()
    }

    fn handle_request(&self, request: &Request, remote: SocketAddr) -> ResourceResult<Response> {
        if request.method != Method::Get {
            debug!(path = %self.path(), method = %request.method, %remote, "Method not allowed");
            return Ok(self.method_not_allowed());
        }
        Ok(self.respond(request)?)
    }

    fn serialize_status(&self, format: ContentFormat) -> Result<Vec<u8>, UnsupportedFormat> {
        self.store.serialize(format)
    }

    fn entity_tag(&self, _format: ContentFormat) -> EntityTag {
        self.store.entity_tag()
    }
}
