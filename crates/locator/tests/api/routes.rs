use locator::ContentError;
use locator_core::Location;
use reqwest::StatusCode;

use crate::helpers::{fixture_api, MockContentApi, TestApp};

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::spawn(fixture_api()).await;

    let response = app.get("/api/v1/health_check").await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn page_renders_list_and_client_config() {
    let app = TestApp::spawn(fixture_api()).await;

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();

    assert!(body.contains(r#"id="location-list""#));
    assert!(body.contains(r#"id="region-buttons""#));
    assert!(body.contains(r#"id="locator-config""#));
    assert!(body.contains("/ui/pkg/locator_wasm.js"));
    assert!(body.contains("Scarborough"));
    assert!(body.contains("Parramatta"));
}

#[tokio::test]
async fn page_respects_region_query() {
    let app = TestApp::spawn(fixture_api()).await;

    let body = app.get("/?region=nsw").await.text().await.unwrap();

    assert!(body.contains("Parramatta"));
    assert!(!body.contains("Scarborough"));
}

#[tokio::test]
async fn list_fragment_filters_by_region() {
    let app = TestApp::spawn(fixture_api()).await;

    let response = app.get("/locations?region=WA").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();

    assert!(body.contains("Belmont"));
    assert!(body.contains("Joondalup"));
    assert!(body.contains("Scarborough"));
    assert!(!body.contains("Parramatta"));
    assert!(!body.contains("Modbury"));

    let belmont = body.find("Belmont").unwrap();
    let scarborough = body.find("Scarborough").unwrap();
    assert!(belmont < scarborough);
}

#[tokio::test]
async fn list_fragment_for_empty_region() {
    let app = TestApp::spawn(fixture_api()).await;

    let body = app.get("/locations?region=TAS").await.text().await.unwrap();

    assert!(body.contains("No gyms found in this region."));
}

#[tokio::test]
async fn popup_fragment_for_known_and_unknown_slugs() {
    let app = TestApp::spawn(fixture_api()).await;

    let response = app.get("/locations/scarborough/popup").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("tel:0863231001"));
    assert!(body.contains("mailto:"));

    let response = app.get("/locations/nowhere/popup").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.text().await.unwrap().contains("Gym not found."));
}

#[tokio::test]
async fn json_locations_are_normalized() {
    let app = TestApp::spawn(fixture_api()).await;

    let response = app.get("/api/v1/locations?region=SA").await;
    assert_eq!(response.status(), StatusCode::OK);
    let locations: Vec<Location> = response.json().await.unwrap();

    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].id, "modbury");
    assert!(locations[0].coordinates.is_some());
}

#[tokio::test]
async fn feed_is_fetched_once_within_ttl() {
    let mut api = MockContentApi::new();
    api.expect_fetch_locations()
        .times(1)
        .returning(|| Ok(crate::helpers::fixture_locations()));
    let app = TestApp::spawn(api).await;

    assert_eq!(app.get("/api/v1/locations").await.status(), StatusCode::OK);
    assert_eq!(app.get("/locations?region=VIC").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn unavailable_feed_renders_empty_list() {
    let mut api = MockContentApi::new();
    api.expect_fetch_locations()
        .returning(|| Err(ContentError::Transient(String::from("503 Service Unavailable"))));
    let app = TestApp::spawn(api).await;

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("No gyms found in this region."));

    let locations: Vec<Location> = app.get("/api/v1/locations").await.json().await.unwrap();
    assert!(locations.is_empty());
}

#[tokio::test]
async fn static_files_are_served_from_ui_dir() {
    let app = TestApp::spawn(fixture_api()).await;

    let response = app.get("/ui/locator.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/javascript; charset=utf-8"
    );

    assert_eq!(app.get("/ui/missing.js").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        app.get("/ui/pkg/..%2F..%2FCargo.toml").await.status(),
        StatusCode::BAD_REQUEST
    );
}
