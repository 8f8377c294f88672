// Resource status cache
//
// Holds the current status of every addressable resource behind one
// reader-writer lock per resource, so that the serialized body, entity tag and
// freshness lifetime handed to a request are always derived from the same
// status version. The `/.well-known/core` directory resource lists every
// registered path in link format.

pub mod content_format;
pub mod directory;
pub mod dispatch;
pub mod message;
pub mod registry;
pub mod snapshot;
pub mod store;
pub mod webservice;

pub use content_format::ContentFormat;
pub use directory::{link_format, DirectoryEntries, DirectoryResource, LinkFormatCodec, WELL_KNOWN_CORE_PATH};
pub use dispatch::dispatch;
pub use message::{Method, Request, Response, ResponseCode};
pub use registry::WebserviceRegistry;
pub use snapshot::StatusSnapshot;
pub use store::{remaining_seconds, ResourceStatusStore, StatusCodec};
pub use webservice::{path_key, ResourceHandle, StatusResource, Webservice};

pub use statuscache_crypto::EntityTag;
pub use statuscache_error::{RegistryError, ResourceError, ResourceResult, UnsupportedFormat};
