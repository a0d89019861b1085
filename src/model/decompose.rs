//! Liu & Jordan decomposition of daily irradiance into an hourly profile.

use std::f64::consts::PI;

use super::geometry::SolarGeometryResult;

/// Number of hourly samples per day.
pub const HOURS_PER_DAY: usize = 24;

/// Hour angle swept per hour (degrees).
const DEGREES_PER_HOUR: f64 = 15.0;

/// Converts a daily total in kWh/m² to the W/m² basis of the thermal model.
const WH_PER_KWH: f64 = 1000.0;

/// Solar-noon-centred hour angle (degrees) at the half-hour mark of `hour`.
///
/// `ω = 15°·(hour + 0.5 − 12)`, so hour 11 maps to −7.5° and hour 12 to 7.5°.
pub fn hour_angle_deg(hour: usize) -> f64 {
    DEGREES_PER_HOUR * (hour as f64 + 0.5 - 12.0)
}

/// Liu & Jordan ratio `r_t` of hourly to daily irradiance for one hour.
///
/// Returns 0 outside the sunlit interval `|ω| ≤ ωs`, for a zero-length day,
/// and wherever rounding pushes the ratio slightly negative at the boundary.
pub fn hourly_ratio(hour: usize, geometry: &SolarGeometryResult) -> f64 {
    let omega_deg = hour_angle_deg(hour);
    if omega_deg.abs() > geometry.sunset_hour_angle_deg {
        return 0.0;
    }

    let ws = geometry.sunset_hour_angle_rad;
    let denominator = ws.sin() - ws * ws.cos();
    if denominator <= 0.0 {
        return 0.0;
    }

    let r_t = (PI / 24.0) * (omega_deg.to_radians().cos() - ws.cos()) / denominator;
    r_t.max(0.0)
}

/// Irradiance (W/m²) for one hour of a day with the given daily total.
///
/// # Arguments
///
/// * `daily_irradiance_kwh` - Daily irradiation (kWh/m²/day)
/// * `hour` - Hour index 0–23
/// * `geometry` - Solar geometry for the day
pub fn decompose_hour(daily_irradiance_kwh: f64, hour: usize, geometry: &SolarGeometryResult) -> f64 {
    hourly_ratio(hour, geometry) * daily_irradiance_kwh * WH_PER_KWH
}

/// Restartable iterator over the 24 hourly irradiance values of one day.
///
/// Pure function of its inputs; cloning yields an independent profile.
#[derive(Debug, Clone)]
pub struct HourlyProfile {
    daily_irradiance_kwh: f64,
    geometry: SolarGeometryResult,
    hour: usize,
}

impl HourlyProfile {
    /// Creates a profile positioned at hour 0.
    pub fn new(daily_irradiance_kwh: f64, geometry: SolarGeometryResult) -> Self {
        Self {
            daily_irradiance_kwh,
            geometry,
            hour: 0,
        }
    }
}

impl Iterator for HourlyProfile {
    /// `(hour, irradiance_w_m2)`
    type Item = (usize, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.hour >= HOURS_PER_DAY {
            return None;
        }
        let h = self.hour;
        self.hour += 1;
        Some((h, decompose_hour(self.daily_irradiance_kwh, h, &self.geometry)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = HOURS_PER_DAY.saturating_sub(self.hour);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for HourlyProfile {}
