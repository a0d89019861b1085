//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::climate::record::YearlyStats;

/// One region in the `/regions` listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    pub name: String,
    pub latitude: f64,
    pub yearly: YearlyStats,
}

/// Region listing with the snapshot version it was read from.
#[derive(Debug, Serialize)]
pub struct RegionsResponse {
    pub version: u64,
    pub regions: Vec<RegionSummary>,
}

/// Month selector for the hourly endpoint.
#[derive(Debug, Deserialize)]
pub struct HourlyQuery {
    /// 0-based month; January when absent.
    pub month: Option<usize>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
