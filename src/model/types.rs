//! Core calculation types: panel parameters, series entries, and results.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::SolarGeometryResult;

/// Panel and plant parameters, immutable for the duration of a calculation.
///
/// # Examples
///
/// ```
/// use pv_yield::model::types::PanelParameters;
///
/// let panel = PanelParameters::new(100.0, 0.18, 0.0045, 45.0, 0.8);
/// assert!((panel.nominal_capacity_kwp() - 18.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelParameters {
    /// Total module area (m², > 0).
    pub area: f64,
    /// Nominal module efficiency, in (0, 1].
    pub efficiency: f64,
    /// Power temperature coefficient β (1/°C, ≥ 0).
    pub temp_coeff: f64,
    /// Nominal operating cell temperature (°C).
    pub noct: f64,
    /// Performance ratio used by the proportional model, in (0, 1].
    pub performance_ratio: f64,
}

impl PanelParameters {
    /// Creates a new parameter set.
    ///
    /// Values are taken as given; range checks live in
    /// [`crate::config::RunConfig::validate`].
    pub fn new(area: f64, efficiency: f64, temp_coeff: f64, noct: f64, performance_ratio: f64) -> Self {
        Self {
            area,
            efficiency,
            temp_coeff,
            noct,
            performance_ratio,
        }
    }

    /// Nominal plant capacity (kWp) derived as `area · efficiency`.
    ///
    /// At 1 kW/m² reference irradiance one square metre at efficiency η
    /// produces η kW.
    pub fn nominal_capacity_kwp(&self) -> f64 {
        self.area * self.efficiency
    }
}

impl Default for PanelParameters {
    fn default() -> Self {
        Self::new(100.0, 0.18, 0.0045, 45.0, 0.8)
    }
}

/// Calculation mode of a [`CalculationResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalcMode {
    /// 24 hourly samples for one day.
    Hourly,
    /// 12 monthly entries for one year.
    Monthly,
}

impl fmt::Display for CalcMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hourly => write!(f, "hourly"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

/// One hour of a simulated day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlySample {
    /// Hour index 0–23.
    pub hour: usize,
    /// Display label, e.g. `"13h"`.
    pub hour_label: String,
    /// Plane irradiance (W/m²).
    pub irradiance: f64,
    /// Cell temperature (°C).
    pub cell_temp: f64,
    /// Energy produced during the hour (kWh).
    pub energy: f64,
}

impl fmt::Display for HourlySample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4} | G={:>7.1} W/m²  Tc={:>5.1} °C  E={:>8.3} kWh",
            self.hour_label, self.irradiance, self.cell_temp, self.energy
        )
    }
}

/// One period (month) of a yield series, simulated or measured.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldSeriesEntry {
    /// Period label, e.g. `"M1"`.
    pub label: String,
    /// Energy produced over the period (kWh).
    pub energy: f64,
    /// Reference yield Yr (kWh/m²/day ÷ 1 kW/m², i.e. hours/day).
    pub reference_yield: f64,
    /// Final yield Yf (kWh/kWp/day).
    pub final_yield: f64,
    /// Performance ratio (%). Non-finite when Yr is zero.
    pub performance_ratio: f64,
    /// Irradiation over the period (kWh/m²).
    pub irradiance_period: f64,
    /// Ambient temperature (°C).
    pub ambient_temp: f64,
    /// Mean cell temperature over sunlit hours (°C), when simulated.
    pub avg_cell_temp: Option<f64>,
    /// Mean irradiance over sunlit hours (W/m²), when simulated.
    pub avg_sunlit_irradiance: Option<f64>,
}

impl YieldSeriesEntry {
    /// Whether the PR of this entry is a usable number.
    ///
    /// Entries with zero reference yield are "not computable" and are
    /// excluded from averaged aggregates.
    pub fn is_computable(&self) -> bool {
        self.performance_ratio.is_finite()
    }
}

impl fmt::Display for YieldSeriesEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4} | E={:>10.1} kWh  Yr={:>5.2}  Yf={:>5.2}  ",
            self.label, self.energy, self.reference_yield, self.final_yield
        )?;
        if self.is_computable() {
            write!(f, "PR={:>6.2}%", self.performance_ratio)
        } else {
            write!(f, "PR=   n/a")
        }
    }
}

/// Ordered series of a calculation, hourly or per period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Series {
    /// Hourly samples of one day.
    Hourly(Vec<HourlySample>),
    /// Monthly entries of one year.
    Monthly(Vec<YieldSeriesEntry>),
}

impl Series {
    /// Number of entries in the series.
    pub fn len(&self) -> usize {
        match self {
            Self::Hourly(s) => s.len(),
            Self::Monthly(s) => s.len(),
        }
    }

    /// Whether the series has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Terminal output of a yield calculation.
///
/// Built once by the engine; fields are private so a result cannot be
/// altered after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    mode: CalcMode,
    series: Series,
    total_energy: f64,
    geometry: Option<SolarGeometryResult>,
}

impl CalculationResult {
    /// Builds an hourly result; the total is the sum of the samples.
    pub fn hourly(samples: Vec<HourlySample>, geometry: SolarGeometryResult) -> Self {
        let total_energy = samples.iter().map(|s| s.energy).sum();
        Self {
            mode: CalcMode::Hourly,
            series: Series::Hourly(samples),
            total_energy,
            geometry: Some(geometry),
        }
    }

    /// Builds a monthly result with an explicit total.
    pub fn monthly(
        entries: Vec<YieldSeriesEntry>,
        total_energy: f64,
        geometry: Option<SolarGeometryResult>,
    ) -> Self {
        Self {
            mode: CalcMode::Monthly,
            series: Series::Monthly(entries),
            total_energy,
            geometry,
        }
    }

    /// Empty monthly result, returned when no data is available.
    pub fn empty() -> Self {
        Self::monthly(Vec::new(), 0.0, None)
    }

    pub fn mode(&self) -> CalcMode {
        self.mode
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    /// Total energy over the whole series (kWh).
    pub fn total_energy(&self) -> f64 {
        self.total_energy
    }

    /// Solar geometry behind the calculation, for explaining the model.
    pub fn geometry(&self) -> Option<&SolarGeometryResult> {
        self.geometry.as_ref()
    }

    /// Hourly samples, if this is an hourly result.
    pub fn hourly_samples(&self) -> Option<&[HourlySample]> {
        match &self.series {
            Series::Hourly(s) => Some(s),
            Series::Monthly(_) => None,
        }
    }

    /// Period entries, if this is a monthly result.
    pub fn entries(&self) -> Option<&[YieldSeriesEntry]> {
        match &self.series {
            Series::Monthly(s) => Some(s),
            Series::Hourly(_) => None,
        }
    }

    /// Distinguishes "no data" from "zero yield".
    pub fn has_data(&self) -> bool {
        !self.series.is_empty()
    }
}

impl fmt::Display for CalculationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.series {
            Series::Hourly(samples) => {
                for s in samples {
                    writeln!(f, "{s}")?;
                }
            }
            Series::Monthly(entries) => {
                for e in entries {
                    writeln!(f, "{e}")?;
                }
            }
        }
        if let Some(g) = &self.geometry {
            writeln!(
                f,
                "Geometry: δ={:.2}°  ωs={:.2}° ({:.4} rad)",
                g.declination_deg, g.sunset_hour_angle_deg, g.sunset_hour_angle_rad
            )?;
        }
        write!(f, "Total energy ({}): {:.2} kWh", self.mode, self.total_energy)
    }
}
