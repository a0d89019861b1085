//! Tabular climate import: one CSV row per `(region, month)`.
//!
//! Header names are matched against English and Vietnamese aliases so the
//! same template works for both. Rows that cannot be keyed are rejected and
//! counted; unusable numeric cells fall back to the missing-data defaults.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::StringRecord;
use log::{info, warn};
use thiserror::Error;

use super::record::{
    ClimateRecord, ClimateStore, DEFAULT_LATITUDE, MONTHS_PER_YEAR, sanitize_month,
};

pub(crate) const REGION_COLUMNS: &[&str] = &["region", "Region Name", "Tên Vùng", "Vùng"];
pub(crate) const LATITUDE_COLUMNS: &[&str] = &["latitude", "Latitude", "Vĩ độ"];
pub(crate) const MONTH_COLUMNS: &[&str] = &["month", "Month", "Tháng (1-12)"];
pub(crate) const IRRADIANCE_COLUMNS: &[&str] = &["ghi", "GHI", "Bức xạ GHI (kWh/m2/ngày)"];
pub(crate) const TEMPERATURE_COLUMNS: &[&str] = &["temp", "Temp", "Nhiệt độ (°C)"];

/// File-level import failure. Row-level problems are reported through
/// [`ImportReport`] instead.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("cannot read import file: {0}")]
    Io(#[from] io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column \"{0}\"")]
    MissingColumn(&'static str),
}

/// Outcome counts of one import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows merged into the result.
    pub accepted: usize,
    /// Rows skipped as unusable.
    pub rejected: usize,
    /// Regions in the resulting data set.
    pub regions: usize,
}

/// One validated climate row.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateRow {
    pub region: String,
    /// Latitude, when the row carries a usable one.
    pub latitude: Option<f64>,
    /// Month number 1–12.
    pub month: u32,
    /// Daily irradiation (kWh/m²/day), defaulted to 0.
    pub daily_irradiance: f64,
    /// Ambient temperature (°C), defaulted to 25.
    pub ambient_temp: f64,
}

/// Column positions resolved from a header row.
pub(crate) fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| aliases.iter().any(|a| h.trim() == *a))
}

/// Parses a finite number from an optional cell.
pub(crate) fn parse_number(record: &StringRecord, column: Option<usize>) -> Option<f64> {
    column
        .and_then(|i| record.get(i))
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn parse_month(record: &StringRecord, column: usize) -> Option<u32> {
    let value = parse_number(record, Some(column))?;
    if value.fract() != 0.0 || !(1.0..=MONTHS_PER_YEAR as f64).contains(&value) {
        return None;
    }
    Some(value as u32)
}

/// Reads and validates climate rows from CSV.
///
/// Returns the usable rows and the number of rejected rows.
///
/// # Errors
///
/// Returns an `ImportError` if the CSV is unreadable or lacks a region or
/// month column.
pub fn read_climate_rows(reader: impl Read) -> Result<(Vec<ClimateRow>, usize), ImportError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let region_col = find_column(&headers, REGION_COLUMNS).ok_or(ImportError::MissingColumn("region"))?;
    let month_col = find_column(&headers, MONTH_COLUMNS).ok_or(ImportError::MissingColumn("month"))?;
    let lat_col = find_column(&headers, LATITUDE_COLUMNS);
    let ghi_col = find_column(&headers, IRRADIANCE_COLUMNS);
    let temp_col = find_column(&headers, TEMPERATURE_COLUMNS);

    let mut rows = Vec::new();
    let mut rejected = 0_usize;

    for (line, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("climate row {}: unreadable ({e}), skipped", line + 1);
                rejected += 1;
                continue;
            }
        };

        let region = record.get(region_col).map(str::trim).unwrap_or_default();
        if region.is_empty() {
            warn!("climate row {}: missing region, skipped", line + 1);
            rejected += 1;
            continue;
        }
        let Some(month) = parse_month(&record, month_col) else {
            warn!("climate row {}: month outside 1-12, skipped", line + 1);
            rejected += 1;
            continue;
        };

        let month_data = sanitize_month(
            parse_number(&record, ghi_col),
            parse_number(&record, temp_col),
        );
        let latitude = parse_number(&record, lat_col).filter(|lat| (-90.0..=90.0).contains(lat));

        rows.push(ClimateRow {
            region: region.to_string(),
            latitude,
            month,
            daily_irradiance: month_data.daily_irradiance,
            ambient_temp: month_data.ambient_temp,
        });
    }

    Ok((rows, rejected))
}

/// Merges rows into a copy of `store`, keyed by `(region, month)`.
///
/// A row overwrites the month it names. Regions not yet in the store are
/// created with default months and the latitude of their first row
/// (falling back to 10°); latitudes of existing regions are kept.
pub fn merge_rows(store: &ClimateStore, rows: &[ClimateRow]) -> ClimateStore {
    store.updated(|regions| {
        for row in rows {
            let record = regions.entry(row.region.clone()).or_insert_with(|| {
                ClimateRecord::with_defaults(
                    row.latitude
                        .filter(|lat| *lat != 0.0)
                        .unwrap_or(DEFAULT_LATITUDE),
                )
            });
            let slot = &mut record.months[row.month as usize - 1];
            slot.daily_irradiance = row.daily_irradiance;
            slot.ambient_temp = row.ambient_temp;
        }
    })
}

/// Imports climate CSV data into a new version of `store`.
///
/// # Errors
///
/// Returns an `ImportError` on file-level failures; the input store is
/// left untouched in every case.
pub fn import_climate_csv(
    store: &ClimateStore,
    reader: impl Read,
) -> Result<(ClimateStore, ImportReport), ImportError> {
    let (rows, rejected) = read_climate_rows(reader)?;
    let merged = merge_rows(store, &rows);
    let report = ImportReport {
        accepted: rows.len(),
        rejected,
        regions: merged.len(),
    };
    info!(
        "climate import: {} rows accepted, {} rejected, {} regions",
        report.accepted, report.rejected, report.regions
    );
    Ok((merged, report))
}

/// Imports climate CSV data from a file path.
///
/// # Errors
///
/// Returns an `ImportError` if the file cannot be opened or parsed.
pub fn import_climate_file(
    store: &ClimateStore,
    path: &Path,
) -> Result<(ClimateStore, ImportReport), ImportError> {
    let file = File::open(path)?;
    import_climate_csv(store, io::BufReader::new(file))
}
