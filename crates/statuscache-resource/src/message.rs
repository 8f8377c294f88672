// Request and response model handed between the dispatch layer and resources
//
// Only the parts a resource needs are modelled: method, the Accept option and
// payload on the way in; code, content, ETag and Max-Age on the way out.

use std::fmt;

use statuscache_crypto::EntityTag;

use crate::content_format::ContentFormat;
use crate::snapshot::StatusSnapshot;

/// Request method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Method code as carried in the message header (0.0x)
    pub fn code(self) -> u8 {
        match self {
            Method::Get => 1,
            Method::Post => 2,
            Method::Put => 3,
            Method::Delete => 4,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// An inbound request, already parsed by the transport layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// Preferred representation, if the client sent an Accept option
    pub accept: Option<ContentFormat>,
    pub payload: Vec<u8>,
}

impl Request {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            accept: None,
            payload: Vec::new(),
        }
    }

    pub fn get() -> Self {
        Self::new(Method::Get)
    }

    pub fn with_accept(mut self, format: ContentFormat) -> Self {
        self.accept = Some(format);
        self
    }

    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = payload.into();
        self
    }
}

/// Response codes produced by this layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    /// 2.05
    Content,
    /// 4.04
    NotFound,
    /// 4.05
    MethodNotAllowed,
    /// 4.06
    NotAcceptable,
    /// 5.00
    InternalServerError,
}

impl ResponseCode {
    fn class_and_detail(self) -> (u8, u8) {
        match self {
            ResponseCode::Content => (2, 5),
            ResponseCode::NotFound => (4, 4),
            ResponseCode::MethodNotAllowed => (4, 5),
            ResponseCode::NotAcceptable => (4, 6),
            ResponseCode::InternalServerError => (5, 0),
        }
    }

    /// Single-byte code, class in the upper three bits
    pub fn code(self) -> u8 {
        let (class, detail) = self.class_and_detail();
        (class << 5) | detail
    }

    pub fn is_success(self) -> bool {
        self.class_and_detail().0 == 2
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (class, detail) = self.class_and_detail();
        write!(f, "{}.{:02}", class, detail)
    }
}

/// A response produced by a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub code: ResponseCode,
    pub content: Vec<u8>,
    pub content_format: Option<ContentFormat>,
    pub etag: Option<EntityTag>,
    /// Freshness lifetime in seconds
    pub max_age: Option<u64>,
}

impl Response {
    pub fn new(code: ResponseCode) -> Self {
        Self {
            code,
            content: Vec::new(),
            content_format: None,
            etag: None,
            max_age: None,
        }
    }

    /// 2.05 response carrying every field of one status snapshot
    pub fn from_snapshot(snapshot: StatusSnapshot) -> Self {
        let max_age = snapshot.max_age();
        let etag = snapshot.entity_tag().clone();
        let format = snapshot.content_format();

        Self::new(ResponseCode::Content)
            .with_content(snapshot.into_body(), format)
            .with_etag(etag)
            .with_max_age(max_age)
    }

    /// Response with a plain-text explanation
    pub fn with_message(code: ResponseCode, message: impl AsRef<str>) -> Self {
        Self::new(code).with_content(message.as_ref().as_bytes().to_vec(), ContentFormat::TEXT_PLAIN_UTF8)
    }

    pub fn with_content(mut self, content: Vec<u8>, format: ContentFormat) -> Self {
        self.content = content;
        self.content_format = Some(format);
        self
    }

    pub fn with_etag(mut self, etag: EntityTag) -> Self {
        self.etag = Some(etag);
        self
    }

    pub fn with_max_age(mut self, seconds: u64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// Content interpreted as UTF-8, lossy
    pub fn content_text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_codes() {
        assert_eq!(ResponseCode::Content.code(), 69);
        assert_eq!(ResponseCode::MethodNotAllowed.code(), 133);
        assert_eq!(ResponseCode::InternalServerError.code(), 160);
        assert_eq!(ResponseCode::NotAcceptable.to_string(), "4.06");
        assert_eq!(ResponseCode::Content.to_string(), "2.05");
        assert!(ResponseCode::Content.is_success());
        assert!(!ResponseCode::NotFound.is_success());
    }

    #[test]
    fn test_response_from_snapshot() {
        let tag = EntityTag::digest(b"21");
        let snapshot = StatusSnapshot::new(b"21".to_vec(), ContentFormat::TEXT_PLAIN_UTF8, tag.clone(), 7);
        let response = Response::from_snapshot(snapshot);

        assert_eq!(response.code, ResponseCode::Content);
        assert_eq!(response.content, b"21");
        assert_eq!(response.content_format, Some(ContentFormat::TEXT_PLAIN_UTF8));
        assert_eq!(response.etag, Some(tag));
        assert_eq!(response.max_age, Some(7));
    }

    #[test]
    fn test_message_response_is_plain_text() {
        let response = Response::with_message(ResponseCode::NotFound, "nothing at /x");
        assert_eq!(response.content_text(), "nothing at /x");
        assert_eq!(response.content_format, Some(ContentFormat::TEXT_PLAIN_UTF8));
        assert_eq!(response.etag, None);
    }

    #[test]
    fn test_request_builders() {
        let request = Request::new(Method::Put)
            .with_accept(ContentFormat::APP_JSON)
            .with_payload("22");
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.accept, Some(ContentFormat::APP_JSON));
        assert_eq!(request.payload, b"22");
        assert_eq!(Method::Delete.to_string(), "DELETE");
        assert_eq!(Method::Get.code(), 1);
    }
}
