//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{ErrorResponse, HourlyQuery, RegionSummary, RegionsResponse};
use crate::climate::record::{ClimateRecord, MONTHS_PER_YEAR};
use crate::model::engine::DayInput;
use crate::model::performance::PerformanceSummary;
use crate::model::types::CalculationResult;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: String) -> ApiError {
    (status, Json(ErrorResponse { error: message }))
}

fn bad_month(month: usize) -> ApiError {
    error(
        StatusCode::BAD_REQUEST,
        format!("`month` ({month}) must be in 0..=11"),
    )
}

fn lookup<'a>(state: &'a AppState, name: &str) -> Result<&'a ClimateRecord, ApiError> {
    state
        .store
        .get(name)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, format!("unknown region \"{name}\"")))
}

/// `GET /regions` → 200 + `RegionsResponse` JSON
pub async fn get_regions(State(state): State<Arc<AppState>>) -> Json<RegionsResponse> {
    let regions = state
        .store
        .region_names()
        .filter_map(|name| {
            state.store.get(name).map(|r| RegionSummary {
                name: name.to_string(),
                latitude: r.latitude,
                yearly: r.yearly_stats(),
            })
        })
        .collect();
    Json(RegionsResponse {
        version: state.store.version(),
        regions,
    })
}

/// `GET /regions/{name}/hourly?month=M` → 200 + hourly `CalculationResult`
/// `month` outside 0–11 → 400, unknown region → 404
pub async fn get_hourly(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<HourlyQuery>,
) -> Result<Json<CalculationResult>, ApiError> {
    let month = query.month.unwrap_or(0);
    if month >= MONTHS_PER_YEAR {
        return Err(bad_month(month));
    }
    let record = lookup(&state, &name)?;
    let day = DayInput::from_record(record, month).ok_or_else(|| bad_month(month))?;
    Ok(Json(state.engine.hourly(&day)))
}

/// `GET /regions/{name}/monthly` → 200 + monthly `CalculationResult`
pub async fn get_monthly(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<CalculationResult>, ApiError> {
    let record = lookup(&state, &name)?;
    Ok(Json(state.engine.monthly(record)))
}

/// `GET /regions/{name}/proportional` → 200 + proportional `CalculationResult`
pub async fn get_proportional(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<CalculationResult>, ApiError> {
    let record = lookup(&state, &name)?;
    Ok(Json(state.engine.proportional(record)))
}

/// `GET /regions/{name}/summary` → 200 + `PerformanceSummary` of the
/// monthly simulation
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<PerformanceSummary>, ApiError> {
    let record = lookup(&state, &name)?;
    let result = state.engine.monthly(record);
    let entries = result.entries().unwrap_or_default();
    Ok(Json(PerformanceSummary::from_series(
        entries,
        state.engine.nominal_capacity_kwp(),
    )))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::climate::record::ClimateStore;
    use crate::model::engine::YieldEngine;
    use crate::model::types::PanelParameters;

    fn make_test_state() -> Arc<AppState> {
        Arc::new(AppState {
            engine: YieldEngine::new(PanelParameters::default()),
            store: ClimateStore::defaults(),
        })
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let app = router(make_test_state());
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn regions_lists_defaults() {
        let (status, json) = get_json("/regions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["regions"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn hourly_returns_24_samples() {
        let (status, json) = get_json("/regions/H%C3%A0%20N%E1%BB%99i/hourly?month=5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["mode"], "hourly");
        assert_eq!(json["series"].as_array().map(Vec::len), Some(24));
    }

    #[tokio::test]
    async fn hourly_rejects_bad_month() {
        let (status, json) = get_json("/regions/H%C3%A0%20N%E1%BB%99i/hourly?month=12").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json.get("error").is_some());
    }

    #[tokio::test]
    async fn unknown_region_is_404() {
        let (status, json) = get_json("/regions/Atlantis/monthly").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json.get("error").is_some());
    }

    #[tokio::test]
    async fn summary_has_metrics() {
        let (status, json) = get_json("/regions/H%C3%A0%20N%E1%BB%99i/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["entryCount"], 12);
        assert!(json["avgPerformanceRatio"].as_f64().is_some());
    }
}
