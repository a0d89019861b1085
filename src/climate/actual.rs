//! Measured production import for comparing a plant against the model.
//!
//! Each row is converted into the same [`YieldSeriesEntry`] shape the
//! engine produces, so both series aggregate through
//! [`PerformanceSummary`](crate::model::performance::PerformanceSummary).

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use log::{info, warn};

use super::import::{ImportError, ImportReport, find_column, parse_number};
use super::record::{DAYS_PER_MONTH, DEFAULT_AMBIENT_TEMP};
use crate::model::performance::{DAYS_PER_PERIOD, final_yield, performance_ratio, reference_yield};
use crate::model::types::YieldSeriesEntry;

pub(crate) const LABEL_COLUMNS: &[&str] = &["month", "Month", "Tháng"];
pub(crate) const ENERGY_COLUMNS: &[&str] = &[
    "actual_energy_kwh",
    "Actual AC Energy (kWh)",
    "Sản lượng AC Thực tế (kWh)",
];
pub(crate) const IRRADIANCE_COLUMNS: &[&str] = &[
    "actual_irradiance_kwh_m2",
    "Actual GHI (kWh/m2/month)",
    "Bức xạ GHI Thực tế (kWh/m2/tháng)",
];
pub(crate) const TEMPERATURE_COLUMNS: &[&str] = &[
    "avg_ambient_temp",
    "Avg Ambient Temp (°C)",
    "Nhiệt độ môi trường TB (°C)",
];

/// One month of measured plant output.
#[derive(Debug, Clone, PartialEq)]
pub struct ActualRow {
    /// Period label as given in the source, e.g. `"T1"`.
    pub label: String,
    /// Measured AC energy (kWh).
    pub energy_kwh: f64,
    /// Measured irradiation over the month (kWh/m²/month).
    pub irradiance_monthly: f64,
    /// Mean ambient temperature (°C), 25 when absent.
    pub ambient_temp: f64,
}

impl ActualRow {
    /// Converts the row into a series entry for a plant of `capacity_kwp`.
    ///
    /// `H_day = H_month / 30`, `Yr = H_day`, `Yf = E / P0 / 30`.
    pub fn to_entry(&self, capacity_kwp: f64) -> YieldSeriesEntry {
        let daily_irradiance = self.irradiance_monthly / f64::from(DAYS_PER_MONTH);
        let yr = reference_yield(daily_irradiance);
        let yf = final_yield(self.energy_kwh, capacity_kwp, DAYS_PER_PERIOD);
        YieldSeriesEntry {
            label: self.label.clone(),
            energy: self.energy_kwh,
            reference_yield: yr,
            final_yield: yf,
            performance_ratio: performance_ratio(yf, yr),
            irradiance_period: self.irradiance_monthly,
            ambient_temp: self.ambient_temp,
            avg_cell_temp: None,
            avg_sunlit_irradiance: None,
        }
    }
}

/// Reads measured production rows from CSV.
///
/// Rows without a usable energy or irradiance value are rejected; a missing
/// label becomes `M<n>` by position.
///
/// # Errors
///
/// Returns an `ImportError` if the CSV is unreadable or lacks the energy or
/// irradiance column.
pub fn read_actual_rows(reader: impl Read) -> Result<(Vec<ActualRow>, ImportReport), ImportError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let energy_col =
        find_column(&headers, ENERGY_COLUMNS).ok_or(ImportError::MissingColumn("actual_energy_kwh"))?;
    let irr_col = find_column(&headers, IRRADIANCE_COLUMNS)
        .ok_or(ImportError::MissingColumn("actual_irradiance_kwh_m2"))?;
    let label_col = find_column(&headers, LABEL_COLUMNS);
    let temp_col = find_column(&headers, TEMPERATURE_COLUMNS);

    let mut rows = Vec::new();
    let mut rejected = 0_usize;

    for (line, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("actual row {}: unreadable ({e}), skipped", line + 1);
                rejected += 1;
                continue;
            }
        };

        let (Some(energy_kwh), Some(irradiance_monthly)) = (
            parse_number(&record, Some(energy_col)),
            parse_number(&record, Some(irr_col)),
        ) else {
            warn!("actual row {}: missing energy or irradiance, skipped", line + 1);
            rejected += 1;
            continue;
        };

        let label = label_col
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map_or_else(|| format!("M{}", line + 1), str::to_string);

        rows.push(ActualRow {
            label,
            energy_kwh,
            irradiance_monthly,
            ambient_temp: parse_number(&record, temp_col).unwrap_or(DEFAULT_AMBIENT_TEMP),
        });
    }

    let report = ImportReport {
        accepted: rows.len(),
        rejected,
        regions: 0,
    };
    info!(
        "actual import: {} rows accepted, {} rejected",
        report.accepted, report.rejected
    );
    Ok((rows, report))
}

/// Reads measured production rows from a file path.
///
/// # Errors
///
/// Returns an `ImportError` if the file cannot be opened or parsed.
pub fn read_actual_file(path: &Path) -> Result<(Vec<ActualRow>, ImportReport), ImportError> {
    let file = File::open(path)?;
    read_actual_rows(io::BufReader::new(file))
}

/// Converts measured rows into a series for a plant of `capacity_kwp`.
pub fn actual_series(rows: &[ActualRow], capacity_kwp: f64) -> Vec<YieldSeriesEntry> {
    rows.iter().map(|r| r.to_entry(capacity_kwp)).collect()
}
