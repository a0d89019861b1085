//! NOCT cell-temperature model and linear temperature derating.

use super::types::PanelParameters;

/// Irradiance at which NOCT is rated (W/m²). Fixed by the NOCT definition.
pub const NOCT_REFERENCE_IRRADIANCE: f64 = 800.0;

/// Ambient temperature at which NOCT is rated (°C).
pub const NOCT_REFERENCE_AMBIENT: f64 = 20.0;

/// Standard test condition cell temperature (°C).
pub const STC_CELL_TEMP: f64 = 25.0;

/// Cell temperature (°C) under the NOCT model.
///
/// `Tc = Ta + (G / 800) · (NOCT − 20)`
pub fn cell_temperature(irradiance_w_m2: f64, ambient_temp: f64, noct: f64) -> f64 {
    ambient_temp + (irradiance_w_m2 / NOCT_REFERENCE_IRRADIANCE) * (noct - NOCT_REFERENCE_AMBIENT)
}

/// Linear power derating factor relative to 25 °C: `1 − β·(Tc − 25)`.
///
/// Not floored; very hot cells with a large coefficient give a negative factor.
pub fn derating_factor(temp_coeff: f64, cell_temp: f64) -> f64 {
    1.0 - temp_coeff * (cell_temp - STC_CELL_TEMP)
}

/// Energy (kWh) produced over one hour at constant irradiance.
///
/// `E = G · A · η · (1 − β·(Tc − 25)) / 1000`
pub fn instantaneous_yield(irradiance_w_m2: f64, panel: &PanelParameters, cell_temp: f64) -> f64 {
    irradiance_w_m2 * panel.area * panel.efficiency * derating_factor(panel.temp_coeff, cell_temp)
        / 1000.0
}
