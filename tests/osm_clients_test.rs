use std::time::{Duration, Instant};

use rescue_locator::domain::{AmenityKind, SourceType};
use rescue_locator::nominatim::NominatimClient;
use rescue_locator::overpass::OverpassClient;
use rescue_locator::utils::geo::{Coordinate, RadiusMeters};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_AGENT: &str = "RescueLocatorTest/1.0";

fn http() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(TEST_AGENT)
        .build()
        .unwrap()
}

fn deadline() -> Instant {
    Instant::now() + Duration::from_secs(5)
}

fn islamabad() -> Coordinate {
    Coordinate::new(33.5, 73.0).unwrap()
}

#[tokio::test]
async fn test_overpass_posts_query_and_classifies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .and(header("user-agent", TEST_AGENT))
        .and(header("content-type", "text/plain"))
        .and(body_string_contains("[out:json][timeout:25];"))
        .and(body_string_contains("out center geom;"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "elements": [
                { "type": "way", "id": 11, "center": { "lat": 33.51, "lon": 73.01 },
                  "tags": { "amenity": "clinic", "name": "City Clinic",
                            "contact:phone": "+92-51-1111111" } },
                { "type": "node", "id": 12, "lat": 33.52, "lon": 73.02,
                  "tags": { "amenity": "fire_station", "name:en": "Fire Station 3" } },
                { "type": "node", "id": 13, "lat": 33.53, "lon": 73.03,
                  "tags": { "amenity": "bench" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OverpassClient::new(http(), format!("{}/api/interpreter", server.uri()));
    let lists = client
        .search(islamabad(), RadiusMeters::default(), deadline())
        .await;

    assert_eq!(lists.hospitals.len(), 1);
    assert_eq!(lists.hospitals[0].source_type, SourceType::Way);
    assert_eq!(lists.hospitals[0].lat, 33.51);
    assert_eq!(lists.hospitals[0].phone.as_deref(), Some("+92-51-1111111"));

    assert_eq!(lists.emergency_services.len(), 1);
    assert_eq!(lists.emergency_services[0].name, "Fire Station 3");
    assert_eq!(lists.emergency_services[0].amenity, AmenityKind::FireStation);

    server.verify().await;
}

#[tokio::test]
async fn test_overpass_failures_yield_empty_lists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("runtime error: out of memory"))
        .mount(&server)
        .await;

    for route in ["/busy", "/garbled"] {
        let client = OverpassClient::new(http(), format!("{}{}", server.uri(), route));
        let lists = client
            .search(islamabad(), RadiusMeters::default(), deadline())
            .await;
        assert!(lists.is_empty(), "{}", route);
    }
}

#[tokio::test]
async fn test_overpass_respects_expired_deadline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "elements": [] }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = OverpassClient::new(http(), server.uri());
    let started = Instant::now();
    let lists = client
        .search(
            islamabad(),
            RadiusMeters::default(),
            Instant::now() + Duration::from_millis(100),
        )
        .await;

    assert!(lists.is_empty());
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_nominatim_sends_scoped_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(header("user-agent", TEST_AGENT))
        .and(query_param("format", "json"))
        .and(query_param("amenity", "police"))
        .and(query_param("lat", "33.5"))
        .and(query_param("lon", "73"))
        .and(query_param("bounded", "1"))
        .and(query_param("viewbox", "72.5,34,73.5,33"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "place_id": 501, "lat": "33.5100", "lon": "73.0100",
              "display_name": "Police Station Saddar, Murree Road, Rawalpindi" },
            { "place_id": 502, "lat": "33.9000", "lon": "73.3900",
              "display_name": "Police Post Murree, Mall Road, Murree" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = NominatimClient::new(http(), format!("{}/", server.uri()));
    let places = client
        .search_amenity(
            islamabad(),
            AmenityKind::Police,
            RadiusMeters::clamped(10_000),
            deadline(),
        )
        .await;

    // Murree is ~55 km out, outside the 10 km radius
    assert_eq!(places.len(), 1);
    assert_eq!(places[0].id, Some(501));
    assert_eq!(places[0].name, "Police Station Saddar");
    assert_eq!(places[0].source_type, SourceType::Nominatim);
    assert_eq!(
        places[0].address.as_deref(),
        Some("Police Station Saddar, Murree Road, Rawalpindi")
    );

    server.verify().await;
}

#[tokio::test]
async fn test_nominatim_errors_yield_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("amenity", "hospital"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("amenity", "fire_station"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "bad" })))
        .mount(&server)
        .await;

    let client = NominatimClient::new(http(), server.uri());
    for amenity in [AmenityKind::Hospital, AmenityKind::FireStation] {
        let places = client
            .search_amenity(islamabad(), amenity, RadiusMeters::default(), deadline())
            .await;
        assert!(places.is_empty());
    }
}
