// Immutable status snapshot returned from one consistent read

use statuscache_crypto::EntityTag;

use crate::content_format::ContentFormat;

/// Serialized body, entity tag and freshness taken from one status version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    body: Vec<u8>,
    content_format: ContentFormat,
    entity_tag: EntityTag,
    max_age: u64,
}

impl StatusSnapshot {
    pub fn new(body: Vec<u8>, content_format: ContentFormat, entity_tag: EntityTag, max_age: u64) -> Self {
        Self {
            body,
            content_format,
            entity_tag,
            max_age,
        }
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn content_format(&self) -> ContentFormat {
        self.content_format
    }

    pub fn entity_tag(&self) -> &EntityTag {
        &self.entity_tag
    }

    /// Seconds the snapshot may be considered fresh
    pub fn max_age(&self) -> u64 {
        self.max_age
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}
