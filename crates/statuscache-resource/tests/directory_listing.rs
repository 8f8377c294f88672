// Directory listing, method gating and path identity through the public API

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use statuscache_core::{DirectoryConfig, ManualClock};
use statuscache_resource::{
    link_format, ContentFormat, DirectoryEntries, DirectoryResource, EntityTag, Method, Request,
    ResourceHandle, ResponseCode, StatusCodec, StatusResource, UnsupportedFormat, Webservice,
    WebserviceRegistry, WELL_KNOWN_CORE_PATH,
};

#[derive(Debug, Clone, Serialize)]
struct Reading {
    celsius: f32,
    sensor: &'static str,
}

/// Plain text or JSON rendering of a temperature reading
struct ReadingCodec;

impl StatusCodec<Reading> for ReadingCodec {
    fn serialize(&self, value: &Reading, format: ContentFormat) -> Result<Vec<u8>, UnsupportedFormat> {
        match format {
            ContentFormat::TEXT_PLAIN_UTF8 => Ok(format!("{:.1}", value.celsius).into_bytes()),
            ContentFormat::APP_JSON => serde_json::to_vec(value).map_err(|_| format.unsupported()),
            _ => Err(format.unsupported()),
        }
    }

    fn derive_tag(&self, value: &Reading) -> EntityTag {
        EntityTag::digest(format!("{}:{}", value.sensor, value.celsius).as_bytes())
    }
}

fn thermometer(path: &str, celsius: f32) -> Arc<StatusResource<Reading, ReadingCodec>> {
    Arc::new(StatusResource::new(
        path,
        Reading {
            celsius,
            sensor: "t1",
        },
        30,
        ReadingCodec,
        ContentFormat::TEXT_PLAIN_UTF8,
    ))
}

fn remote() -> SocketAddr {
    "198.51.100.4:5683".parse().unwrap()
}

#[test]
fn test_listing_of_two_paths_in_registry_order() {
    let a: Arc<dyn Webservice> = thermometer("/a", 20.0);
    let b: Arc<dyn Webservice> = thermometer("/b", 21.0);
    let directory = DirectoryResource::new([&a, &b].into_iter().collect());

    assert_eq!(directory.serialize(), b"</a>,\n</b>");
    assert_eq!(directory.serialize(), link_format(["/a", "/b"]));

    let reversed = DirectoryResource::new([&b, &a].into_iter().collect());
    assert_eq!(reversed.serialize(), b"</b>,\n</a>");
}

#[test]
fn test_same_set_same_tag_and_new_path_changes_both() {
    let a: Arc<dyn Webservice> = thermometer("/a", 20.0);
    let b: Arc<dyn Webservice> = thermometer("/b", 21.0);
    let c: Arc<dyn Webservice> = thermometer("/c", 22.0);

    let directory = DirectoryResource::new([&a, &b].into_iter().collect());
    let listing = directory.serialize();
    let tag = directory.entity_tag(ContentFormat::APP_LINK_FORMAT);

    directory.update([&a, &b].into_iter().collect());
    assert_eq!(directory.serialize(), listing);
    assert_eq!(directory.entity_tag(ContentFormat::APP_LINK_FORMAT), tag);

    directory.update([&a, &b, &c].into_iter().collect());
    assert_ne!(directory.serialize(), listing);
    assert_ne!(directory.entity_tag(ContentFormat::APP_LINK_FORMAT), tag);
}

#[test]
fn test_method_gating_on_directory() {
    let registry = WebserviceRegistry::new();
    registry.register(thermometer("/temperature", 19.5)).unwrap();

    for method in [Method::Post, Method::Put, Method::Delete] {
        let response = registry.handle(WELL_KNOWN_CORE_PATH, &Request::new(method), remote());
        assert_eq!(response.code, ResponseCode::MethodNotAllowed);
        assert_eq!(
            response.content,
            "Service \"/.well-known/core\" only allows GET requests.".as_bytes()
        );
        assert!(!response.content_text().contains("/temperature"));
    }

    let response = registry.handle(WELL_KNOWN_CORE_PATH, &Request::get(), remote());
    assert_eq!(response.code, ResponseCode::Content);
    assert_eq!(response.content, b"</.well-known/core>,\n</temperature>");
    assert_eq!(response.content_format, Some(ContentFormat::APP_LINK_FORMAT));
    assert_eq!(
        response.etag,
        Some(EntityTag::digest(b"</.well-known/core>,\n</temperature>"))
    );
    assert_eq!(response.etag, Some(registry.directory().recompute_tag()));
}

#[test]
fn test_handles_with_same_path_are_one_key() {
    let warm = ResourceHandle::new(thermometer("/temperature", 30.0));
    let cold = ResourceHandle::new(thermometer("/temperature", -5.0));

    assert_eq!(warm, cold);
    assert!(warm == "/temperature");

    let mut keys = HashSet::new();
    keys.insert(warm);
    assert!(!keys.insert(cold));
    assert!(keys.contains("/temperature"));
}

#[test]
fn test_status_resource_content_negotiation_through_registry() {
    let registry = WebserviceRegistry::new();
    let sensor = thermometer("/temperature", 19.5);
    registry.register(sensor.clone()).unwrap();

    let response = registry.handle("/temperature", &Request::get(), remote());
    assert_eq!(response.code, ResponseCode::Content);
    assert_eq!(response.content_text(), "19.5");

    let json = registry.handle(
        "/temperature",
        &Request::get().with_accept(ContentFormat::APP_JSON),
        remote(),
    );
    let value: serde_json::Value = serde_json::from_slice(&json.content).unwrap();
    assert_eq!(value["celsius"], 19.5);
    assert_eq!(value["sensor"], "t1");
    assert_eq!(json.etag, response.etag);

    let xml = registry.handle(
        "/temperature",
        &Request::get().with_accept(ContentFormat::APP_XML),
        remote(),
    );
    assert_eq!(xml.code, ResponseCode::NotAcceptable);

    sensor.set_status(
        Reading {
            celsius: 21.0,
            sensor: "t1",
        },
        30,
    );
    let updated = registry.handle("/temperature", &Request::get(), remote());
    assert_eq!(updated.content_text(), "21.0");
    assert_ne!(updated.etag, response.etag);
}

#[test]
fn test_configured_directory_lifetime_decays() {
    let clock = Arc::new(ManualClock::new(0));
    let registry = WebserviceRegistry::with_config(&DirectoryConfig::default().lifetime_seconds(20), clock.clone());

    let response = registry.handle(WELL_KNOWN_CORE_PATH, &Request::get(), remote());
    assert_eq!(response.max_age, Some(20));

    clock.advance(Duration::from_secs(15));
    let response = registry.handle(WELL_KNOWN_CORE_PATH, &Request::get(), remote());
    assert_eq!(response.max_age, Some(5));

    // registering restarts the listing's lifetime
    registry.register(thermometer("/a", 1.0)).unwrap();
    let response = registry.handle(WELL_KNOWN_CORE_PATH, &Request::get(), remote());
    assert_eq!(response.max_age, Some(20));
}

#[test]
fn test_empty_directory_serializes_to_nothing() {
    let directory = DirectoryResource::new(DirectoryEntries::new());
    assert!(directory.serialize().is_empty());
    assert_eq!(directory.recompute_tag(), EntityTag::digest(b""));
}
