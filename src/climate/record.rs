//! Climate records and the versioned, copy-on-write climate store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Months in a climate record.
pub const MONTHS_PER_YEAR: usize = 12;

/// Days per month in the 30-day month approximation.
pub const DAYS_PER_MONTH: u32 = 30;

/// Ambient temperature substituted for missing data (°C).
pub const DEFAULT_AMBIENT_TEMP: f64 = 25.0;

/// Latitude assigned to a region created by import without one (degrees).
pub const DEFAULT_LATITUDE: f64 = 10.0;

/// One month of site climate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyClimate {
    /// Mean daily global horizontal irradiation (kWh/m²/day, ≥ 0).
    pub daily_irradiance: f64,
    /// Mean ambient temperature (°C).
    pub ambient_temp: f64,
}

impl MonthlyClimate {
    pub fn new(daily_irradiance: f64, ambient_temp: f64) -> Self {
        Self {
            daily_irradiance,
            ambient_temp,
        }
    }
}

impl Default for MonthlyClimate {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_AMBIENT_TEMP)
    }
}

/// Yearly irradiation statistics of a record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyStats {
    /// Mean of the 12 daily irradiation values (kWh/m²/day).
    pub avg_daily_irradiance: f64,
    /// Annual irradiation, `Σ daily · 30` (kWh/m²).
    pub annual_irradiance: f64,
}

/// Calendar climate of one site: latitude plus exactly 12 months.
///
/// The fixed-size array makes the 12-month invariant structural.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateRecord {
    /// Site latitude (degrees, north positive).
    pub latitude: f64,
    /// Months indexed 0 (January) to 11 (December).
    pub months: [MonthlyClimate; MONTHS_PER_YEAR],
}

impl ClimateRecord {
    /// Creates a record with the given months.
    pub fn new(latitude: f64, months: [MonthlyClimate; MONTHS_PER_YEAR]) -> Self {
        Self { latitude, months }
    }

    /// Creates a record with every month at the missing-data defaults.
    pub fn with_defaults(latitude: f64) -> Self {
        Self::new(latitude, [MonthlyClimate::default(); MONTHS_PER_YEAR])
    }

    /// Builds a record from `(daily_irradiance, ambient_temp)` pairs.
    pub fn from_pairs(latitude: f64, pairs: [(f64, f64); MONTHS_PER_YEAR]) -> Self {
        Self::new(latitude, pairs.map(|(g, t)| MonthlyClimate::new(g, t)))
    }

    /// Representative day of year for a 0-based month: `month · 30 + 15`.
    pub fn representative_day(month: usize) -> u32 {
        month as u32 * DAYS_PER_MONTH + 15
    }

    /// Annual irradiation using the 30-day month approximation (kWh/m²).
    pub fn annual_irradiance(&self) -> f64 {
        self.months
            .iter()
            .map(|m| m.daily_irradiance * f64::from(DAYS_PER_MONTH))
            .sum()
    }

    pub fn yearly_stats(&self) -> YearlyStats {
        let daily_sum: f64 = self.months.iter().map(|m| m.daily_irradiance).sum();
        YearlyStats {
            avg_daily_irradiance: daily_sum / MONTHS_PER_YEAR as f64,
            annual_irradiance: self.annual_irradiance(),
        }
    }
}

/// Invalid climate data handed over by the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid climate JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("region \"{region}\": {reason}")]
    InvalidRecord { region: String, reason: String },
}

/// Unvalidated record shape as exchanged with storage.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    latitude: f64,
    months: Vec<RawMonth>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMonth {
    daily_irradiance: Option<f64>,
    ambient_temp: Option<f64>,
}

/// Immutable snapshot of all regions' climate records.
///
/// Every change produces a new store with a bumped `version`; a snapshot
/// handed to a calculation is never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateStore {
    version: u64,
    regions: BTreeMap<String, ClimateRecord>,
}

impl ClimateStore {
    /// Built-in regions shipped with the tool.
    pub fn defaults() -> Self {
        let mut regions = BTreeMap::new();
        regions.insert(
            "Hồ Chí Minh".to_string(),
            ClimateRecord::from_pairs(
                10.8,
                [
                    (5.2, 27.0),
                    (5.8, 28.0),
                    (6.1, 29.0),
                    (5.9, 30.0),
                    (5.1, 29.0),
                    (4.5, 28.0),
                    (4.4, 27.0),
                    (4.6, 27.0),
                    (4.2, 27.0),
                    (4.1, 27.0),
                    (4.3, 27.0),
                    (4.8, 27.0),
                ],
            ),
        );
        regions.insert(
            "Hà Nội".to_string(),
            ClimateRecord::from_pairs(
                21.0,
                [
                    (2.1, 17.0),
                    (2.3, 18.0),
                    (2.8, 21.0),
                    (3.9, 24.0),
                    (5.2, 28.0),
                    (5.5, 30.0),
                    (5.4, 30.0),
                    (5.1, 29.0),
                    (4.8, 28.0),
                    (4.2, 25.0),
                    (3.5, 22.0),
                    (2.7, 19.0),
                ],
            ),
        );
        Self {
            version: 0,
            regions,
        }
    }

    /// Store with no regions.
    pub fn empty() -> Self {
        Self {
            version: 0,
            regions: BTreeMap::new(),
        }
    }

    /// Discards imported data and returns the built-in regions as a new
    /// version.
    pub fn reset(&self) -> Self {
        Self {
            version: self.version + 1,
            ..Self::defaults()
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, region: &str) -> Option<&ClimateRecord> {
        self.regions.get(region)
    }

    /// Region names in store order.
    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Returns a new version of the store with `edit` applied to a copy of
    /// the regions.
    pub fn updated(&self, edit: impl FnOnce(&mut BTreeMap<String, ClimateRecord>)) -> Self {
        let mut regions = self.regions.clone();
        edit(&mut regions);
        Self {
            version: self.version + 1,
            regions,
        }
    }

    /// Returns a new version with `record` inserted or replaced.
    pub fn with_record(&self, region: &str, record: ClimateRecord) -> Self {
        self.updated(|regions| {
            regions.insert(region.to_string(), record);
        })
    }

    /// Parses and validates a store exchanged as JSON
    /// (`{ region: { latitude, months: [12 × { dailyIrradiance, ambientTemp }] } }`).
    ///
    /// Missing or non-finite month fields fall back to the defaults and
    /// negative irradiance is clamped to 0.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` for malformed JSON, a month count other than
    /// 12, or a latitude that is non-finite or outside `[-90, 90]`.
    pub fn from_json_str(s: &str) -> Result<Self, StoreError> {
        let raw: BTreeMap<String, RawRecord> = serde_json::from_str(s)?;
        let mut regions = BTreeMap::new();

        for (region, rec) in raw {
            if !rec.latitude.is_finite() || !(-90.0..=90.0).contains(&rec.latitude) {
                return Err(StoreError::InvalidRecord {
                    region,
                    reason: format!("latitude {} outside [-90, 90]", rec.latitude),
                });
            }
            if rec.months.len() != MONTHS_PER_YEAR {
                return Err(StoreError::InvalidRecord {
                    region,
                    reason: format!("expected 12 months, got {}", rec.months.len()),
                });
            }

            let mut months = [MonthlyClimate::default(); MONTHS_PER_YEAR];
            for (slot, m) in months.iter_mut().zip(&rec.months) {
                *slot = sanitize_month(m.daily_irradiance, m.ambient_temp);
            }
            regions.insert(region, ClimateRecord::new(rec.latitude, months));
        }

        Ok(Self {
            version: 0,
            regions,
        })
    }

    /// Serializes the regions in the exchange shape read by
    /// [`ClimateStore::from_json_str`].
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.regions)
    }
}

/// Applies the missing-data defaults to one month of raw values.
pub(crate) fn sanitize_month(daily_irradiance: Option<f64>, ambient_temp: Option<f64>) -> MonthlyClimate {
    let daily_irradiance = daily_irradiance
        .filter(|g| g.is_finite())
        .map_or(0.0, |g| g.max(0.0));
    let ambient_temp = ambient_temp
        .filter(|t| t.is_finite())
        .unwrap_or(DEFAULT_AMBIENT_TEMP);
    MonthlyClimate::new(daily_irradiance, ambient_temp)
}
