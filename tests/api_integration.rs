#![cfg(feature = "api")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use pv_yield::api::{AppState, router};
use pv_yield::climate::record::{ClimateRecord, ClimateStore};
use pv_yield::model::engine::YieldEngine;
use pv_yield::model::types::PanelParameters;
use serde_json::Value;
use tower::util::ServiceExt;

fn state_with(store: ClimateStore) -> Arc<AppState> {
    Arc::new(AppState {
        engine: YieldEngine::new(PanelParameters::default()),
        store,
    })
}

async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn hourly_total_matches_engine() {
    let store = ClimateStore::empty()
        .with_record("site", ClimateRecord::from_pairs(10.8, [(5.2, 27.0); 12]));
    let (status, json) = get(state_with(store), "/regions/site/hourly?month=0").await;
    assert_eq!(status, StatusCode::OK);
    let total = json["totalEnergy"].as_f64().expect("numeric total");
    assert!((total - 85.407).abs() < 0.01, "total {total}");
    assert!(json["geometry"]["declinationDeg"].as_f64().is_some());
}

#[tokio::test]
async fn proportional_total_is_closed_form() {
    let store = ClimateStore::empty()
        .with_record("site", ClimateRecord::from_pairs(10.8, [(5.2, 27.0); 12]));
    let (status, json) = get(state_with(store), "/regions/site/proportional").await;
    assert_eq!(status, StatusCode::OK);
    let total = json["totalEnergy"].as_f64().expect("numeric total");
    assert!((total - 26956.8).abs() < 1e-6);
    assert_eq!(json["series"].as_array().map(Vec::len), Some(12));
}

#[tokio::test]
async fn regions_reports_snapshot_version() {
    let store = ClimateStore::defaults().reset();
    let (status, json) = get(state_with(store), "/regions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["version"], 1);
    let first = &json["regions"][0];
    assert!(first["yearly"]["annualIrradiance"].as_f64().is_some());
}

#[tokio::test]
async fn errors_are_json() {
    let state = state_with(ClimateStore::defaults());
    let (status, json) = get(state.clone(), "/regions/nowhere/summary").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().is_some_and(|e| e.contains("nowhere")));

    let (status, _) = get(state, "/regions/nowhere/hourly?month=99").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
