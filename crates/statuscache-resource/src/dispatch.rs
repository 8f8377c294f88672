// Translation of resource outcomes into responses
//
// A failing or panicking resource must not take the serving process down:
// every outcome of `handle_request` becomes a response here.

use std::net::SocketAddr;
use std::panic::{self, AssertUnwindSafe};

use statuscache_error::ResourceError;
use tracing::{debug, error};

use crate::message::{Request, Response, ResponseCode};
use crate::webservice::Webservice;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Run `request` against `resource` and map every failure to a response.
///
/// * unsupported content format → 4.06 Not Acceptable
/// * missing resource → 4.04 Not Found
/// * any other error, or a panic → 5.00 Internal Server Error
pub fn dispatch(resource: &dyn Webservice, request: &Request, remote: SocketAddr) -> Response {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| resource.handle_request(request, remote)));

    match outcome {
        Ok(Ok(response)) => response,
        Ok(Err(ResourceError::UnsupportedFormat(unsupported))) => {
            debug!(path = %resource.path(), %remote, content_format = unsupported.content_format, "Not acceptable");
            Response::with_message(ResponseCode::NotAcceptable, unsupported.to_string())
        }
        Ok(Err(ResourceError::NotFound(path))) => {
            Response::with_message(ResponseCode::NotFound, format!("Resource not found: {}", path))
        }
        Ok(Err(ResourceError::Unexpected(err))) => {
            error!(path = %resource.path(), %remote, error = %err, "Request handling failed");
            Response::with_message(ResponseCode::InternalServerError, INTERNAL_ERROR_MESSAGE)
        }
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(path = %resource.path(), %remote, reason = %reason, "Request handler panicked");
            Response::with_message(ResponseCode::InternalServerError, INTERNAL_ERROR_MESSAGE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_format::ContentFormat;
    use crate::message::Method;
    use statuscache_crypto::EntityTag;
    use statuscache_error::{ResourceResult, UnsupportedFormat};

    /// Resource whose behaviour is picked by the request method
    struct Faulty;

    impl Webservice for Faulty {
        fn path(&self) -> &str {
            "/faulty"
        }

        fn handle_request(&self, request: &Request, _remote: SocketAddr) -> ResourceResult<Response> {
            match request.method {
                Method::Get => Ok(Response::with_message(ResponseCode::Content, "fine")),
                Method::Post => Err(ContentFormat::APP_EXI.unsupported().into()),
                Method::Put => Err(statuscache_error::anyhow::anyhow!("disk on fire").into()),
                Method::Delete => panic!("handler bug"),
            }
        }

        fn serialize_status(&self, format: ContentFormat) -> Result<Vec<u8>, UnsupportedFormat> {
            Err(format.unsupported())
        }

        fn entity_tag(&self, _: ContentFormat) -> EntityTag {
            EntityTag::default()
        }
    }

    fn remote() -> SocketAddr {
        "10.0.0.7:40000".parse().unwrap()
    }

    #[test]
    fn test_success_passes_through() {
        let response = dispatch(&Faulty, &Request::get(), remote());
        assert_eq!(response.code, ResponseCode::Content);
        assert_eq!(response.content_text(), "fine");
    }

    #[test]
    fn test_unsupported_format_is_not_acceptable() {
        let response = dispatch(&Faulty, &Request::new(Method::Post), remote());
        assert_eq!(response.code, ResponseCode::NotAcceptable);
        assert_eq!(response.content_text(), "Content format 47 is not supported");
    }

    #[test]
    fn test_unexpected_failure_is_internal_error() {
        let response = dispatch(&Faulty, &Request::new(Method::Put), remote());
        assert_eq!(response.code, ResponseCode::InternalServerError);
        assert_eq!(response.content_text(), INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_panic_is_internal_error() {
        let response = dispatch(&Faulty, &Request::new(Method::Delete), remote());
        assert_eq!(response.code, ResponseCode::InternalServerError);

        // still serving afterwards
        let response = dispatch(&Faulty, &Request::get(), remote());
        assert_eq!(response.code, ResponseCode::Content);
    }
}
