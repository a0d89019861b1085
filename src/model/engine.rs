//! Yield engine composing geometry, decomposition, thermal derating, and
//! performance aggregation into the hourly, monthly, and proportional modes.

use log::debug;

use crate::climate::record::{ClimateRecord, DAYS_PER_MONTH, MonthlyClimate};

use super::decompose::HourlyProfile;
use super::geometry::{SolarGeometryResult, compute_geometry};
use super::performance::{
    DAYS_PER_PERIOD, final_yield, performance_ratio, proportional_yield, reference_yield,
};
use super::thermal::{cell_temperature, instantaneous_yield};
use super::types::{CalculationResult, HourlySample, PanelParameters, YieldSeriesEntry};

/// Climate inputs for a single simulated day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayInput {
    /// Daily irradiation (kWh/m²/day).
    pub daily_irradiance: f64,
    /// Ambient temperature (°C).
    pub ambient_temp: f64,
    /// Site latitude (degrees).
    pub latitude: f64,
    /// Day of year, 1–365.
    pub day_of_year: u32,
}

impl DayInput {
    /// Representative day of `month` (0-based) of a climate record, or
    /// `None` when `month` is not in `0..12`.
    pub fn from_record(record: &ClimateRecord, month: usize) -> Option<Self> {
        record
            .months
            .get(month)
            .map(|m| Self::for_month(record.latitude, month, m))
    }

    fn for_month(latitude: f64, month: usize, climate: &MonthlyClimate) -> Self {
        Self {
            daily_irradiance: climate.daily_irradiance,
            ambient_temp: climate.ambient_temp,
            latitude,
            day_of_year: ClimateRecord::representative_day(month),
        }
    }
}

/// One simulated day with its sunlit-hour averages.
#[derive(Debug, Clone)]
pub struct DaySimulation {
    pub geometry: SolarGeometryResult,
    pub samples: Vec<HourlySample>,
    /// Daily energy (kWh).
    pub total_energy: f64,
    /// Mean cell temperature over sunlit hours (°C); ambient when none.
    pub avg_cell_temp: f64,
    /// Mean irradiance over sunlit hours (W/m²); 0 when none.
    pub avg_sunlit_irradiance: f64,
}

/// Stateless yield calculator parametrised by a panel.
///
/// Holds only its inputs; every method is a pure function of them and the
/// arguments, so one engine can serve any number of concurrent callers.
///
/// # Examples
///
/// ```
/// use pv_yield::model::engine::{DayInput, YieldEngine};
/// use pv_yield::model::types::PanelParameters;
///
/// let engine = YieldEngine::new(PanelParameters::default());
/// let day = DayInput { daily_irradiance: 5.2, ambient_temp: 27.0, latitude: 10.8, day_of_year: 15 };
/// let result = engine.hourly(&day);
/// assert_eq!(result.series().len(), 24);
/// assert!(result.total_energy() < 93.6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldEngine {
    panel: PanelParameters,
    nominal_capacity_kwp: f64,
}

impl YieldEngine {
    /// Creates an engine whose nominal capacity is `area · efficiency`.
    pub fn new(panel: PanelParameters) -> Self {
        Self {
            panel,
            nominal_capacity_kwp: panel.nominal_capacity_kwp(),
        }
    }

    /// Overrides the nominal plant capacity (kWp) used for Yf and CUF.
    pub fn with_nominal_capacity(mut self, nominal_capacity_kwp: f64) -> Self {
        self.nominal_capacity_kwp = nominal_capacity_kwp;
        self
    }

    pub fn panel(&self) -> &PanelParameters {
        &self.panel
    }

    pub fn nominal_capacity_kwp(&self) -> f64 {
        self.nominal_capacity_kwp
    }

    /// Simulates the 24 hours of one day.
    pub fn simulate_day(&self, day: &DayInput) -> DaySimulation {
        let geometry = compute_geometry(day.latitude, day.day_of_year);

        let mut samples = Vec::with_capacity(24);
        let mut total_energy = 0.0_f64;
        let mut sunlit_hours = 0_usize;
        let mut cell_temp_sum = 0.0_f64;
        let mut irradiance_sum = 0.0_f64;

        for (hour, irradiance) in HourlyProfile::new(day.daily_irradiance, geometry) {
            let cell_temp = cell_temperature(irradiance, day.ambient_temp, self.panel.noct);
            let energy = instantaneous_yield(irradiance, &self.panel, cell_temp);
            total_energy += energy;

            if irradiance > 0.0 {
                sunlit_hours += 1;
                cell_temp_sum += cell_temp;
                irradiance_sum += irradiance;
            }

            samples.push(HourlySample {
                hour,
                hour_label: format!("{hour}h"),
                irradiance,
                cell_temp,
                energy,
            });
        }

        let (avg_cell_temp, avg_sunlit_irradiance) = if sunlit_hours > 0 {
            let n = sunlit_hours as f64;
            (cell_temp_sum / n, irradiance_sum / n)
        } else {
            (day.ambient_temp, 0.0)
        };

        DaySimulation {
            geometry,
            samples,
            total_energy,
            avg_cell_temp,
            avg_sunlit_irradiance,
        }
    }

    /// Hourly mode: one day, 24 samples, total daily energy.
    pub fn hourly(&self, day: &DayInput) -> CalculationResult {
        let sim = self.simulate_day(day);
        debug!(
            "hourly: lat={} n={} -> {:.3} kWh",
            day.latitude, day.day_of_year, sim.total_energy
        );
        CalculationResult::hourly(sim.samples, sim.geometry)
    }

    /// Monthly mode: each month's representative day scaled by 30 days,
    /// with per-month Yr, Yf and PR.
    pub fn monthly(&self, record: &ClimateRecord) -> CalculationResult {
        let mut entries = Vec::with_capacity(record.months.len());
        let mut first_geometry = None;

        for (idx, month) in record.months.iter().enumerate() {
            let sim = self.simulate_day(&DayInput::for_month(record.latitude, idx, month));
            first_geometry.get_or_insert(sim.geometry);

            let energy = sim.total_energy * f64::from(DAYS_PER_MONTH);
            let yr = reference_yield(month.daily_irradiance);
            let yf = final_yield(energy, self.nominal_capacity_kwp, DAYS_PER_PERIOD);

            entries.push(YieldSeriesEntry {
                label: format!("M{}", idx + 1),
                energy,
                reference_yield: yr,
                final_yield: yf,
                performance_ratio: performance_ratio(yf, yr),
                irradiance_period: month.daily_irradiance * f64::from(DAYS_PER_MONTH),
                ambient_temp: month.ambient_temp,
                avg_cell_temp: Some(sim.avg_cell_temp),
                avg_sunlit_irradiance: Some(sim.avg_sunlit_irradiance),
            });
        }

        let total: f64 = entries.iter().map(|e| e.energy).sum();
        debug!("monthly: lat={} -> {:.1} kWh/year", record.latitude, total);
        CalculationResult::monthly(entries, total, first_geometry)
    }

    /// PR-proportional mode: `E = PR · A · η · GHI` without hourly
    /// decomposition.
    ///
    /// The total applies the model to the annual irradiation; the series
    /// applies it to each month's `daily · 30`.
    pub fn proportional(&self, record: &ClimateRecord) -> CalculationResult {
        let p = &self.panel;
        let entries: Vec<YieldSeriesEntry> = record
            .months
            .iter()
            .enumerate()
            .map(|(idx, month)| {
                let irradiance_period = month.daily_irradiance * f64::from(DAYS_PER_MONTH);
                let energy =
                    proportional_yield(p.performance_ratio, p.area, p.efficiency, irradiance_period);
                let yr = reference_yield(month.daily_irradiance);
                let yf = final_yield(energy, self.nominal_capacity_kwp, DAYS_PER_PERIOD);
                YieldSeriesEntry {
                    label: format!("M{}", idx + 1),
                    energy,
                    reference_yield: yr,
                    final_yield: yf,
                    performance_ratio: performance_ratio(yf, yr),
                    irradiance_period,
                    ambient_temp: month.ambient_temp,
                    avg_cell_temp: None,
                    avg_sunlit_irradiance: None,
                }
            })
            .collect();

        let total = proportional_yield(
            p.performance_ratio,
            p.area,
            p.efficiency,
            record.annual_irradiance(),
        );
        debug!("proportional: PR={} -> {:.1} kWh/year", p.performance_ratio, total);
        CalculationResult::monthly(entries, total, None)
    }
}
