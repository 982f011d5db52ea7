//! Mesonet client tests against an in-process HTTP server.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use raob_api::config::UpstreamConfig;
use raob_api::upstream::{MesonetClient, SoundingSource, StationSource};
use raob_common::RaobError;
use test_utils::{
    empty_sounding_response_json, sample_stations, sounding_response_json,
    station_directory_json, unstable_sounding,
};

/// Sounding archive stand-in keyed on the `station` query parameter:
/// OAX has a sounding, EMPTY has none, BROKEN fails, GARBAGE is not JSON,
/// ALIAS uses the `profile` key.
async fn raob(Query(params): Query<HashMap<String, String>>) -> Response {
    let station = params.get("station").cloned().unwrap_or_default();
    let ts = params.get("ts").cloned().unwrap_or_default();

    match station.as_str() {
        "OAX" => Json(sounding_response_json("OAX", &ts, &unstable_sounding())).into_response(),
        "EMPTY" => Json(empty_sounding_response_json()).into_response(),
        "NOKEY" => Json(json!({})).into_response(),
        "NOLEVELS" => Json(json!({"profiles": [{"data": []}]})).into_response(),
        "ALIAS" => Json(json!({
            "profiles": [{"profile": [{"pres": 1000.0, "tmpc": 25.0, "dwpc": 20.0}]}]
        }))
        .into_response(),
        "GARBAGE" => (StatusCode::OK, "<html>oops</html>").into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
    }
}

async fn stations() -> Response {
    let mut body = station_directory_json(&sample_stations());
    if let Some(data) = body["data"].as_array_mut() {
        data.push(json!({"id": "NUL", "name": "No Coordinates", "lat": null, "lon": null}));
    }
    Json(body).into_response()
}

async fn spawn_upstream() -> SocketAddr {
    let app = Router::new()
        .route("/json/raob.py", get(raob))
        .route("/api/1/network/RAOB.json", get(stations))
        .route(
            "/broken/RAOB.json",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> MesonetClient {
    MesonetClient::new(UpstreamConfig {
        station_url: format!("http://{}/api/1/network/RAOB.json", addr),
        sounding_url: format!("http://{}/json/raob.py", addr),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_sounding() {
    let client = client_for(spawn_upstream().await);

    let profile = client.fetch("oax", "2024-05-20T12:00:00Z").await.unwrap();

    assert_eq!(profile, unstable_sounding());
}

#[tokio::test]
async fn test_empty_profiles_is_not_found() {
    let client = client_for(spawn_upstream().await);

    for station in ["EMPTY", "NOKEY", "NOLEVELS"] {
        let err = client.fetch(station, "2024-05-20T12:00:00Z").await.unwrap_err();
        match err {
            RaobError::NotFound { station: s, timestamp } => {
                assert_eq!(s, station);
                assert_eq!(timestamp, "2024-05-20T12:00:00Z");
            }
            other => panic!("expected NotFound for {}, got {:?}", station, other),
        }
    }
}

#[tokio::test]
async fn test_server_error_is_upstream_error() {
    let client = client_for(spawn_upstream().await);

    let err = client.fetch("BROKEN", "2024-05-20T12:00:00Z").await.unwrap_err();

    assert!(matches!(err, RaobError::Upstream { status: 500, .. }));
}

#[tokio::test]
async fn test_undecodable_body_is_unavailable() {
    let client = client_for(spawn_upstream().await);
    let err = client.fetch("GARBAGE", "t").await.unwrap_err();
    assert!(matches!(err, RaobError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn test_profile_key_alias() {
    let client = client_for(spawn_upstream().await);
    let profile = client.fetch("alias", "t").await.unwrap();
    assert_eq!(profile.len(), 1);
    assert_eq!(profile[0].pressure, Some(1000.0));
}

#[tokio::test]
async fn test_connection_refused_is_unavailable() {
    // Bind then drop to get a port with nothing listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(addr);

    let err = client.fetch("OAX", "t").await.unwrap_err();
    assert!(matches!(err, RaobError::UpstreamUnavailable(_)));

    let err = client.directory().await.unwrap_err();
    assert!(matches!(err, RaobError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn test_station_directory() {
    let client = client_for(spawn_upstream().await);

    let directory = client.directory().await.unwrap();

    // The record without coordinates is skipped
    assert_eq!(directory.len(), sample_stations().len());
    assert!(directory.stations.iter().all(|s| s.id != "NUL"));
    assert!(directory.stations.iter().any(|s| s.id == "DNR" && s.name == "Denver"));
}

#[tokio::test]
async fn test_station_directory_error_status() {
    let addr = spawn_upstream().await;
    let client = MesonetClient::new(UpstreamConfig {
        station_url: format!("http://{}/broken/RAOB.json", addr),
        sounding_url: format!("http://{}/json/raob.py", addr),
        timeout: Duration::from_secs(5),
    })
    .unwrap();

    let err = client.directory().await.unwrap_err();
    assert!(matches!(err, RaobError::UpstreamUnavailable(_)));
}
