// Hashing primitives for cache validation
//
// Entity tags are derived from serialized resource state so that clients and
// proxies can validate cached representations.

pub mod hash;
pub mod tag;

pub use hash::{Blake3HashFunction, HashAlgorithm, HashError, HashFunction, HashOutput};
pub use tag::{EntityTag, ENTITY_TAG_LENGTH};
