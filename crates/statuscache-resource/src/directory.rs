// The `/.well-known/core` directory resource
//
// Its status is the set of registered resources; the representation is a
// link-format listing of their paths in registry order. The listing and its
// entity tag are re-derived under the store's write lock whenever the
// registry pushes a new entry set.

use std::fmt;
use std::net::SocketAddr;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use statuscache_core::{ClockSource, DirectoryConfig, SystemClock};
use statuscache_crypto::EntityTag;
use statuscache_error::{ResourceResult, UnsupportedFormat};
use tracing::{debug, trace};

use crate::content_format::ContentFormat;
use crate::message::{Method, Request, Response};
use crate::store::StatusCodec;
use crate::webservice::{path_key, StatusResource, Webservice};

/// Well-known path of the directory resource
pub const WELL_KNOWN_CORE_PATH: &str = "/.well-known/core";

const LINK_SEPARATOR: &str = ",\n";

/// Render paths as `<path>,\n` entries without a trailing separator.
pub fn link_format<'a>(paths: impl IntoIterator<Item = &'a str>) -> Vec<u8> {
    let mut buffer = String::new();

    for path in paths {
        buffer.push('<');
        buffer.push_str(path);
        buffer.push('>');
        buffer.push_str(LINK_SEPARATOR);
    }

    // At least one entry was emitted
    if !buffer.is_empty() {
        buffer.truncate(buffer.len() - LINK_SEPARATOR.len());
    }

    buffer.into_bytes()
}

/// Registered resources, keyed by path, in registry order
///
/// Entries hold weak references: the directory lists itself, and the registry
/// owns the resources.
#[derive(Clone, Default)]
pub struct DirectoryEntries {
    entries: IndexMap<String, Weak<dyn Webservice>>,
}

impl DirectoryEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource under its path, keeping the position of an existing entry
    pub fn insert(&mut self, resource: &Arc<dyn Webservice>) {
        self.entries
            .insert(path_key(resource.as_ref()).to_string(), Arc::downgrade(resource));
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The live resource at `path`, if it is listed and still alive
    pub fn get(&self, path: &str) -> Option<Arc<dyn Webservice>> {
        self.entries.get(path).and_then(|weak| weak.upgrade())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<&'a Arc<dyn Webservice>> for DirectoryEntries {
    fn from_iter<I: IntoIterator<Item = &'a Arc<dyn Webservice>>>(iter: I) -> Self {
        let mut entries = Self::new();
        for resource in iter {
            entries.insert(resource);
        }
        entries
    }
}

impl fmt::Debug for DirectoryEntries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.paths()).finish()
    }
}

/// Renders directory entries in link format and tags the listing bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkFormatCodec;

impl StatusCodec<DirectoryEntries> for LinkFormatCodec {
    fn serialize(&self, entries: &DirectoryEntries, format: ContentFormat) -> Result<Vec<u8>, UnsupportedFormat> {
        if format != ContentFormat::APP_LINK_FORMAT {
            return Err(format.unsupported());
        }
        Ok(link_format(entries.paths()))
    }

    fn derive_tag(&self, entries: &DirectoryEntries) -> EntityTag {
        EntityTag::digest(&link_format(entries.paths()))
    }
}

/// Read-only listing of all registered resource paths
pub struct DirectoryResource {
    inner: StatusResource<DirectoryEntries, LinkFormatCodec>,
    lifetime_seconds: u64,
}

impl DirectoryResource {
    /// Directory that is never considered fresh by clients
    pub fn new(entries: DirectoryEntries) -> Self {
        Self::with_config(entries, &DirectoryConfig::default(), Arc::new(SystemClock::new()))
    }

    pub fn with_config(entries: DirectoryEntries, config: &DirectoryConfig, clock: Arc<dyn ClockSource>) -> Self {
        Self {
            inner: StatusResource::with_clock(
                WELL_KNOWN_CORE_PATH,
                entries,
                config.lifetime_seconds,
                LinkFormatCodec,
                ContentFormat::APP_LINK_FORMAT,
                clock,
            ),
            lifetime_seconds: config.lifetime_seconds,
        }
    }

    /// Replace the listed entry set
    pub fn update(&self, entries: DirectoryEntries) {
        debug!(entries = entries.len(), "Directory entries updated");
        self.inner.set_status(entries, self.lifetime_seconds);
    }

    /// Link-format listing of the current entry set
    pub fn serialize(&self) -> Vec<u8> {
        let listing = link_format(self.inner.status().paths());
        trace!(content = %String::from_utf8_lossy(&listing), "Directory listing");
        listing
    }

    /// Tag of the current listing, computed afresh
    pub fn recompute_tag(&self) -> EntityTag {
        EntityTag::digest(&self.serialize())
    }

    pub fn entries(&self) -> Arc<DirectoryEntries> {
        self.inner.status()
    }

    pub fn max_age(&self) -> u64 {
        self.inner.max_age()
    }
}

impl Webservice for DirectoryResource {
    fn path(&self) -> &str {
        WELL_KNOWN_CORE_PATH
    }

    /// GET answers with the listing; Accept options are ignored. Any other
    /// method gets 4.05.
    fn handle_request(&self, request: &Request, remote: SocketAddr) -> ResourceResult<Response> {
        if request.method != Method::Get {
            debug!(method = %request.method, %remote, "Directory only allows GET");
            return Ok(self.inner.method_not_allowed());
        }

        let snapshot = self.inner.snapshot(ContentFormat::APP_LINK_FORMAT)?;
        Ok(Response::from_snapshot(snapshot))
    }

    fn serialize_status(&self, format: ContentFormat) -> Result<Vec<u8>, UnsupportedFormat> {
        self.inner.serialize_status(format)
    }

    fn entity_tag(&self, format: ContentFormat) -> EntityTag {
        self.inner.entity_tag(format)
    }

    fn shutdown(&self) {
        // nothing held beyond the status
    }
}
