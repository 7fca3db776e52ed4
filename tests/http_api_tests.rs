#![cfg(feature = "http_api")]

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use crop_calendar::{CareEvent, Plan, Season, WeekBucket, http_api};
use tower::util::ServiceExt;

fn new_state() -> http_api::AppState {
    http_api::AppState::new(Plan::default())
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn season_endpoint_caches_per_mode() {
    let state = new_state();
    let app = http_api::router(state.clone());

    let (status, bytes) = get(app.clone(), "/season").await;
    assert_eq!(status, StatusCode::OK);
    let season: Season = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(season.weeks.len(), 28);

    let (status, bytes) = get(app.clone(), "/season?mode=alternate").await;
    assert_eq!(status, StatusCode::OK);
    let alternate: Season = serde_json::from_slice(&bytes).unwrap();
    assert!(alternate.events().all(|e| e.id.starts_with("tc-")));

    let _ = get(app, "/season").await;
    assert_eq!(state.cached_seasons(), 2);
}

#[tokio::test]
async fn week_endpoint_returns_bucket_or_404() {
    let app = http_api::router(new_state());

    let (status, bytes) = get(app.clone(), "/season/weeks/10").await;
    assert_eq!(status, StatusCode::OK);
    let week: WeekBucket = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(week.index, 10);

    let (status, _) = get(app.clone(), "/season/weeks/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(app, "/season/weeks/1?mode=sideways").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn next_fertilization_endpoint() {
    let app = http_api::router(new_state());

    let (status, bytes) = get(app.clone(), "/next-fertilization?at=2025-09-04").await;
    assert_eq!(status, StatusCode::OK);
    let event: Option<CareEvent> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(event.unwrap().id, "fert-2-20250921");

    let (status, bytes) = get(app.clone(), "/next-fertilization?at=2026-02-01T09:00").await;
    assert_eq!(status, StatusCode::OK);
    let event: Option<CareEvent> = serde_json::from_slice(&bytes).unwrap();
    assert!(event.is_none());

    let (status, _) = get(app, "/next-fertilization?at=tomorrow").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_and_tables() {
    let app = http_api::router(new_state());
    let (status, _) = get(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);

    let (status, bytes) = get(app, "/plants").await;
    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["plants"].as_array().unwrap().len(), 5);
    assert_eq!(body["wash_windows"].as_array().unwrap().len(), 2);
}
