// Entity tags for cache validation

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hash::{Blake3HashFunction, HashError, HashFunction};

/// Number of hash bytes kept in a derived entity tag.
///
/// CoAP limits the ETag option to 1..=8 bytes.
pub const ENTITY_TAG_LENGTH: usize = 8;

/// Opaque validator derived from a resource status
///
/// Tags compare by bytes only. Derived tags are truncated hashes of the
/// serialized status; resources are free to build tags any other way through
/// [`EntityTag::new`].
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EntityTag(Vec<u8>);

impl EntityTag {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Derive a fixed-size tag from `data` using BLAKE3.
    pub fn digest(data: &[u8]) -> Self {
        Self::digest_with(&Blake3HashFunction, data)
    }

    /// Derive a fixed-size tag from `data` using the given hash function.
    pub fn digest_with(function: &dyn HashFunction, data: &[u8]) -> Self {
        let hash = function.hash(data);
        Self(hash.as_bytes()[..ENTITY_TAG_LENGTH].to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, HashError> {
        let bytes = hex::decode(hex_str).map_err(|_| HashError::InvalidFormat)?;
        if bytes.len() > ENTITY_TAG_LENGTH {
            return Err(HashError::InvalidLength(bytes.len()));
        }
        Ok(Self(bytes))
    }
}

impl fmt::Debug for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityTag({})", self.to_hex())
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<Vec<u8>> for EntityTag {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for EntityTag {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
