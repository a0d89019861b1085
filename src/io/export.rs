//! CSV export of calculation results and import templates.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::model::types::{CalculationResult, Series};

/// Column header for hourly series export.
const HOURLY_HEADER: &str = "hour,label,irradiance_w_m2,cell_temp_c,energy_kwh";

/// Column header for monthly series export.
const MONTHLY_HEADER: &str = "label,energy_kwh,irradiance_kwh_m2,ambient_temp_c,\
                              reference_yield,final_yield,performance_ratio_pct";

/// Header and example rows of the climate import template.
const CLIMATE_TEMPLATE: &[&[&str]] = &[
    &["region", "latitude", "month", "ghi", "temp"],
    &["Hồ Chí Minh", "10.8", "1", "5.2", "27"],
    &["Hồ Chí Minh", "10.8", "2", "5.8", "28"],
];

/// Header and example rows of the measured production template.
const ACTUAL_TEMPLATE: &[&[&str]] = &[
    &["month", "actual_energy_kwh", "actual_irradiance_kwh_m2", "avg_ambient_temp"],
    &["T1", "5000", "150", "27"],
    &["T2", "5500", "160", "28"],
    &["T3", "6000", "180", "29"],
];

/// Exports a result series to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(result: &CalculationResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(result, buf)
}

/// Writes a result series as CSV to any writer.
///
/// Hourly results get one row per hour, monthly results one row per
/// period. A PR that is not computable is written as an empty cell.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(result: &CalculationResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    match result.series() {
        Series::Hourly(samples) => {
            wtr.write_record(HOURLY_HEADER.split(','))?;
            for s in samples {
                wtr.write_record(&[
                    s.hour.to_string(),
                    s.hour_label.clone(),
                    format!("{:.4}", s.irradiance),
                    format!("{:.4}", s.cell_temp),
                    format!("{:.4}", s.energy),
                ])?;
            }
        }
        Series::Monthly(entries) => {
            wtr.write_record(MONTHLY_HEADER.split(',').map(str::trim))?;
            for e in entries {
                let pr = if e.is_computable() {
                    format!("{:.4}", e.performance_ratio)
                } else {
                    String::new()
                };
                wtr.write_record(&[
                    e.label.clone(),
                    format!("{:.4}", e.energy),
                    format!("{:.4}", e.irradiance_period),
                    format!("{:.4}", e.ambient_temp),
                    format!("{:.4}", e.reference_yield),
                    format!("{:.4}", e.final_yield),
                    pr,
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Template selector for [`write_template`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// Climate rows keyed by region and month.
    Climate,
    /// Measured monthly production.
    Actual,
}

impl Template {
    /// Parses `"climate"` or `"actual"`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "climate" => Some(Self::Climate),
            "actual" => Some(Self::Actual),
            _ => None,
        }
    }
}

/// Writes an import template (header plus example rows) as CSV.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_template(template: Template, writer: impl Write) -> io::Result<()> {
    let rows = match template {
        Template::Climate => CLIMATE_TEMPLATE,
        Template::Actual => ACTUAL_TEMPLATE,
    };
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    for row in rows {
        wtr.write_record(*row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes an import template to a file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_template(template: Template, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_template(template, io::BufWriter::new(file))
}
