//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use pv_yield::climate::record::{ClimateRecord, ClimateStore};
use pv_yield::model::engine::{DayInput, YieldEngine};
use pv_yield::model::types::PanelParameters;

/// Built-in region used by most fixtures.
pub const HCMC: &str = "Hồ Chí Minh";

/// Default rooftop panel (100 m², 18 %, 0.45 %/°C, NOCT 45 °C, PR 0.8).
pub fn default_panel() -> PanelParameters {
    PanelParameters::new(100.0, 0.18, 0.0045, 45.0, 0.8)
}

/// Engine for [`default_panel`] with derived capacity (18 kWp).
pub fn default_engine() -> YieldEngine {
    YieldEngine::new(default_panel())
}

/// Ho Chi Minh City record from the built-in store.
pub fn hcmc_record() -> ClimateRecord {
    ClimateStore::defaults()
        .get(HCMC)
        .cloned()
        .expect("built-in region should exist")
}

/// A January day in Ho Chi Minh City (5.2 kWh/m²/day, 27 °C, day 15).
pub fn hcmc_january() -> DayInput {
    DayInput {
        daily_irradiance: 5.2,
        ambient_temp: 27.0,
        latitude: 10.8,
        day_of_year: 15,
    }
}

/// Twelve identical months.
pub fn constant_record(latitude: f64, daily_irradiance: f64, ambient_temp: f64) -> ClimateRecord {
    ClimateRecord::from_pairs(latitude, [(daily_irradiance, ambient_temp); 12])
}
