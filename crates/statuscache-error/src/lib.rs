// Status cache error handling
// Central location for error types, codes and the shared error trait

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

// Re-export common error handling tools for convenience
pub use anyhow;
pub use thiserror;

/// Error domains representing different components of the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorDomain {
    Resource, Registry, Config, Dispatch,
}
impl fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorDomain::Resource => write!(f, "resource"),
            ErrorDomain::Registry => write!(f, "registry"),
            ErrorDomain::Config => write!(f, "config"),
            ErrorDomain::Dispatch => write!(f, "dispatch"),
        }
    }
}

/// Error code structure for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ErrorCode(pub u32);
impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// Error codes, grouped by domain
pub mod codes {
    use crate::ErrorCode;

    // Resource error codes start with 1000
    pub const UNSUPPORTED_FORMAT: ErrorCode = ErrorCode(1001);
    pub const RESOURCE_NOT_FOUND: ErrorCode = ErrorCode(1002);
    pub const UNEXPECTED_FAILURE: ErrorCode = ErrorCode(1003);

    // Registry error codes start with 2000
    pub const ALREADY_REGISTERED: ErrorCode = ErrorCode(2001);
    pub const NOT_REGISTERED: ErrorCode = ErrorCode(2002);
    pub const INVALID_PATH: ErrorCode = ErrorCode(2003);

    // Config error codes start with 3000
    pub const CONFIG_IO: ErrorCode = ErrorCode(3001);
    pub const CONFIG_PARSE: ErrorCode = ErrorCode(3002);
    pub const TRACING_INIT: ErrorCode = ErrorCode(3003);
}

/// Base trait for all errors raised by the status cache.
pub trait StatusCacheError: StdError + Send + Sync + Any + 'static {
    /// Numeric code of this error
    fn code(&self) -> ErrorCode;

    /// Component the error originates from
    fn domain(&self) -> ErrorDomain;

    /// Returns this error as a `&dyn Any` to allow downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// A resource status could not be serialized into the requested content format.
///
/// This is not fatal: the caller answers with a "not acceptable" response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Content format {content_format} is not supported")]
pub struct UnsupportedFormat {
    /// Numeric content format identifier that was requested
    pub content_format: u32,
}

impl UnsupportedFormat {
    pub fn new(content_format: u32) -> Self {
        Self { content_format }
    }
}

impl StatusCacheError for UnsupportedFormat {
    fn code(&self) -> ErrorCode { codes::UNSUPPORTED_FORMAT }
    fn domain(&self) -> ErrorDomain { ErrorDomain::Resource }
    fn as_any(&self) -> &dyn Any { self }
}

/// Failures reported while a resource handles a request
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The requested representation cannot be produced
    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormat),

    /// No resource is registered at the requested path
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Any other failure raised by a resource implementation
    #[error("Unexpected failure: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl StatusCacheError for ResourceError {
    fn code(&self) -> ErrorCode {
        match self {
            ResourceError::UnsupportedFormat(_) => codes::UNSUPPORTED_FORMAT,
            ResourceError::NotFound(_) => codes::RESOURCE_NOT_FOUND,
            ResourceError::Unexpected(_) => codes::UNEXPECTED_FAILURE,
        }
    }
    fn domain(&self) -> ErrorDomain { ErrorDomain::Resource }
    fn as_any(&self) -> &dyn Any { self }
}

/// Registry-specific error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A resource is already registered at this path
    #[error("Path already registered: {0}")]
    AlreadyRegistered(String),

    /// No resource is registered at this path
    #[error("Path not registered: {0}")]
    NotFound(String),

    /// The path is not usable as a resource path
    #[error("Invalid resource path: {0:?}")]
    InvalidPath(String),
}

impl StatusCacheError for RegistryError {
    fn code(&self) -> ErrorCode {
        match self {
            RegistryError::AlreadyRegistered(_) => codes::ALREADY_REGISTERED,
            RegistryError::NotFound(_) => codes::NOT_REGISTERED,
            RegistryError::InvalidPath(_) => codes::INVALID_PATH,
        }
    }
    fn domain(&self) -> ErrorDomain { ErrorDomain::Registry }
    fn as_any(&self) -> &dyn Any { self }
}

/// Configuration and startup errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Failed to initialize tracing: {0}")]
    Tracing(String),
}

impl StatusCacheError for ConfigError {
    fn code(&self) -> ErrorCode {
        match self {
            ConfigError::Io(_) => codes::CONFIG_IO,
            ConfigError::Parse(_) => codes::CONFIG_PARSE,
            ConfigError::Tracing(_) => codes::TRACING_INIT,
        }
    }
    fn domain(&self) -> ErrorDomain { ErrorDomain::Config }
    fn as_any(&self) -> &dyn Any { self }
}

/// Result type for request handling
pub type ResourceResult<T> = Result<T, ResourceError>;
/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;
