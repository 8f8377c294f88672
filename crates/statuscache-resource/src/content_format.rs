// Content format identifiers

use std::fmt;

use serde::{Deserialize, Serialize};
use statuscache_error::UnsupportedFormat;

/// Numeric identifier of a representation's media type (CoAP Content-Format).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentFormat(u32);

impl ContentFormat {
    pub const TEXT_PLAIN_UTF8: Self = Self(0);
    pub const APP_LINK_FORMAT: Self = Self(40);
    pub const APP_XML: Self = Self(41);
    pub const APP_OCTET_STREAM: Self = Self(42);
    pub const APP_EXI: Self = Self(47);
    pub const APP_JSON: Self = Self(50);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u32 {
        self.0
    }

    /// Media type for the registered identifiers
    pub fn media_type(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("text/plain; charset=utf-8"),
            40 => Some("application/link-format"),
            41 => Some("application/xml"),
            42 => Some("application/octet-stream"),
            47 => Some("application/exi"),
            50 => Some("application/json"),
            _ => None,
        }
    }

    /// The error reported when a status cannot be rendered in this format
    pub fn unsupported(self) -> UnsupportedFormat {
        UnsupportedFormat::new(self.0)
    }
}

impl From<u32> for ContentFormat {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.media_type() {
            Some(media_type) => write!(f, "{} ({})", self.0, media_type),
            None => write!(f, "{}", self.0),
        }
    }
}
