use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use cagemap::config::AppConfig;
use cagemap::data::AppState;
use cagemap::server::build_router;
use http_body_util::BodyExt;
use tower::ServiceExt;

fn fixture_state() -> Arc<AppState> {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/data");
    AppState::load(&AppConfig::default().with_data_dir(dir)).expect("fixtures should load")
}

fn app() -> Router {
    build_router(fixture_state())
}

async fn get(uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let resp = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, headers, body.to_vec())
}

async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, _, body) = get(uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_reports_record_counts() {
    let (status, json) = get_json("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["records"]["industrial"], 6);
    assert_eq!(json["records"]["license"], 3);
}

#[tokio::test]
async fn dataset_routes_use_upstream_keys() {
    let (status, json) = get_json("/api/aphis-reports").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["Certificate Number"], "34-R-0001");
    assert_eq!(json[0]["Animals Tested On"], "12 Dogs, 3 Rabbits");

    let (_, json) = get_json("/api/inspection-reports").await;
    assert_eq!(json.as_array().map(Vec::len), Some(3));
    assert_eq!(json[1]["Geocodio Latitude"], 36.64);

    let (_, json) = get_json("/api/locations").await;
    assert_eq!(json[0]["type"], "Pig Slaughterhouse");
    assert_eq!(json[0]["animals_slaughtered"], "Pigs");
}

#[tokio::test]
async fn filter_returns_visible_sets_and_counts() {
    let (status, json) =
        get_json("/api/filter?country=US&region=IA&categories=slaughter&research=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["counts"]["total"], 1);
    assert_eq!(json["industrial"][0]["establishment_name"], "Hawkeye Pork");
    assert_eq!(json["industrial"][0]["category"], "slaughter");
    assert_eq!(json["industrial"][0]["label"], "Pig Slaughterhouse");
    assert_eq!(json["research"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn unknown_country_is_bad_request() {
    let (status, json) = get_json("/api/filter?country=atlantis").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "unknown country 'atlantis'");
}

#[tokio::test]
async fn unknown_category_is_bad_request() {
    let (status, _) = get_json("/api/filter?categories=slaughter,zoo").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn regions_list_the_loaded_bundeslaender() {
    let (status, json) = get_json("/api/regions?country=DE").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["country"], "DE");
    assert_eq!(json["regions"][0]["code"], "BY");
    assert_eq!(json["regions"][0]["name"], "Bayern");
    assert_eq!(json["regions"][1]["code"], "DE_UNKNOWN");
}

#[tokio::test]
async fn export_sets_filename_by_scope() {
    let (status, headers, body) = get("/api/export.csv").await;
    assert_eq!(status, StatusCode::OK);
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("cagemap_all_"));
    let text = String::from_utf8(body).unwrap();
    assert_eq!(text.lines().count(), 12);

    let (_, headers, body) = get("/api/export.csv?country=FR").await;
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("cagemap_filtered_"));
    let text = String::from_utf8(body).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("Ferme de Bretagne"));
}

#[tokio::test]
async fn classify_endpoint() {
    let (status, json) = get_json("/api/classify?type=Mixed%20Farm%20(Pigs)").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["category"], "breeder");
    assert_eq!(json["label"], "Mixed Farm (Pigs)");
    assert_eq!(json["rule"], "mixed_composite");

    let (status, _) = get_json("/api/classify").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let (status, json) = get_json("/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Route not found");
}

#[tokio::test]
async fn region_without_country_narrows_the_export() {
    let (status, headers, body) = get("/api/export.csv?region=IA").await;
    assert_eq!(status, StatusCode::OK);
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("cagemap_filtered_"));
    let text = String::from_utf8(body).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("Hawkeye Pork"));
}
