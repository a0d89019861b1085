//! IEC 61724-1 performance metrics: Yr, Yf, PR, CUF, and the proportional
//! PR yield model.
//!
//! Per-entry metrics may be non-finite (zero reference yield or capacity);
//! [`PerformanceSummary::from_series`] excludes those entries from averages
//! while still counting their energy.

use std::fmt;

use log::warn;
use serde::Serialize;

use super::types::YieldSeriesEntry;

/// Standard reference irradiance (kW/m²).
pub const REFERENCE_IRRADIANCE: f64 = 1.0;

/// Days per aggregation period (30-day month approximation).
pub const DAYS_PER_PERIOD: u32 = 30;

/// Hours per aggregation period used by CUF (`30 · 24`).
pub const HOURS_PER_PERIOD: f64 = 720.0;

/// Reference yield `Yr = H / G_ref` (hours/day).
pub fn reference_yield(daily_irradiance_kwh: f64) -> f64 {
    daily_irradiance_kwh / REFERENCE_IRRADIANCE
}

/// Final yield `Yf = E / P0 / days` (kWh/kWp/day).
pub fn final_yield(period_energy_kwh: f64, nominal_capacity_kwp: f64, days_in_period: u32) -> f64 {
    period_energy_kwh / nominal_capacity_kwp / f64::from(days_in_period)
}

/// Performance ratio `PR = Yf / Yr · 100` (%).
///
/// Non-finite when `reference_yield` is zero; callers treat that as
/// "not computable".
pub fn performance_ratio(final_yield: f64, reference_yield: f64) -> f64 {
    final_yield / reference_yield * 100.0
}

/// Capacity utilisation factor (%): energy over the energy of the plant
/// running at full rated capacity for `period_count · hours_per_period` hours.
pub fn capacity_utilization_factor(
    total_energy_kwh: f64,
    nominal_capacity_kwp: f64,
    period_count: usize,
    hours_per_period: f64,
) -> f64 {
    total_energy_kwh / (nominal_capacity_kwp * period_count as f64 * hours_per_period) * 100.0
}

/// Proportional PR model `E = PR · A · η · GHI`.
///
/// # Examples
///
/// ```
/// use pv_yield::model::performance::proportional_yield;
///
/// let e = proportional_yield(0.8, 100.0, 0.18, 1872.0);
/// assert!((e - 26_956.8).abs() < 1e-6);
/// ```
pub fn proportional_yield(pr: f64, area: f64, efficiency: f64, irradiance_kwh_m2: f64) -> f64 {
    pr * area * efficiency * irradiance_kwh_m2
}

/// Aggregate metrics over a yield series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    /// Sum of energy over all entries (kWh).
    pub total_energy: f64,
    /// Mean PR over computable entries (%).
    pub avg_performance_ratio: f64,
    /// Mean Yf over computable entries.
    pub avg_final_yield: f64,
    /// Mean Yr over computable entries.
    pub avg_reference_yield: f64,
    /// Capacity utilisation factor over all entries (%). Non-finite for
    /// zero capacity.
    pub capacity_utilization: f64,
    /// Number of entries in the series.
    pub entry_count: usize,
    /// Number of entries with a finite PR.
    pub computable_entries: usize,
}

impl PerformanceSummary {
    /// Aggregates a monthly series against a plant of the given capacity.
    ///
    /// An empty series yields an all-zero summary; check
    /// [`PerformanceSummary::has_data`] to tell it apart from zero yield.
    pub fn from_series(entries: &[YieldSeriesEntry], nominal_capacity_kwp: f64) -> Self {
        if entries.is_empty() {
            return Self {
                total_energy: 0.0,
                avg_performance_ratio: 0.0,
                avg_final_yield: 0.0,
                avg_reference_yield: 0.0,
                capacity_utilization: 0.0,
                entry_count: 0,
                computable_entries: 0,
            };
        }

        let mut total_energy = 0.0_f64;
        let mut pr_sum = 0.0_f64;
        let mut yf_sum = 0.0_f64;
        let mut yr_sum = 0.0_f64;
        let mut computable = 0_usize;

        for e in entries {
            total_energy += e.energy;
            if e.is_computable() {
                pr_sum += e.performance_ratio;
                yf_sum += e.final_yield;
                yr_sum += e.reference_yield;
                computable += 1;
            } else {
                warn!("PR not computable for {}; excluded from averages", e.label);
            }
        }

        let mean = |sum: f64| {
            if computable > 0 {
                sum / computable as f64
            } else {
                0.0
            }
        };

        Self {
            total_energy,
            avg_performance_ratio: mean(pr_sum),
            avg_final_yield: mean(yf_sum),
            avg_reference_yield: mean(yr_sum),
            capacity_utilization: capacity_utilization_factor(
                total_energy,
                nominal_capacity_kwp,
                entries.len(),
                HOURS_PER_PERIOD,
            ),
            entry_count: entries.len(),
            computable_entries: computable,
        }
    }

    /// Whether the summary was built from at least one entry.
    pub fn has_data(&self) -> bool {
        self.entry_count > 0
    }
}

impl fmt::Display for PerformanceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Performance Report (IEC 61724-1) ---")?;
        if !self.has_data() {
            return write!(f, "No data");
        }
        writeln!(f, "Total energy:          {:.1} kWh", self.total_energy)?;
        if self.computable_entries > 0 {
            writeln!(f, "Average PR:            {:.2}%", self.avg_performance_ratio)?;
        } else {
            writeln!(f, "Average PR:            n/a")?;
        }
        writeln!(f, "Average Yf:            {:.2} kWh/kWp/day", self.avg_final_yield)?;
        writeln!(f, "Average Yr:            {:.2} h/day", self.avg_reference_yield)?;
        if self.capacity_utilization.is_finite() {
            writeln!(f, "CUF:                   {:.2}%", self.capacity_utilization)?;
        } else {
            writeln!(f, "CUF:                   n/a")?;
        }
        write!(
            f,
            "Periods:               {} ({} computable)",
            self.entry_count, self.computable_entries
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn make_entry(energy: f64, yr: f64, capacity: f64) -> YieldSeriesEntry {
        let yf = final_yield(energy, capacity, DAYS_PER_PERIOD);
        YieldSeriesEntry {
            label: "M".to_string(),
            energy,
            reference_yield: yr,
            final_yield: yf,
            performance_ratio: performance_ratio(yf, yr),
            irradiance_period: yr * 30.0,
            ambient_temp: 25.0,
            avg_cell_temp: None,
            avg_sunlit_irradiance: None,
        }
    }

    #[test]
    fn reference_yield_equals_daily_irradiance() {
        assert_eq!(reference_yield(5.2), 5.2);
    }

    #[test]
    fn final_yield_per_day() {
        // 2700 kWh over 30 days on an 18 kWp plant
        assert_abs_diff_eq!(final_yield(2700.0, 18.0, 30), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn pr_is_percentage() {
        assert_abs_diff_eq!(performance_ratio(4.0, 5.0), 80.0, epsilon = 1e-12);
    }

    #[test]
    fn pr_with_zero_reference_is_not_finite() {
        assert!(!performance_ratio(4.0, 0.0).is_finite());
        assert!(performance_ratio(0.0, 0.0).is_nan());
    }

    #[test]
    fn cuf_full_output_is_hundred_percent() {
        // 18 kWp running flat out for 2 months of 720 h
        let cuf = capacity_utilization_factor(18.0 * 1440.0, 18.0, 2, HOURS_PER_PERIOD);
        assert_abs_diff_eq!(cuf, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn cuf_zero_capacity_is_not_finite() {
        assert!(!capacity_utilization_factor(10.0, 0.0, 1, HOURS_PER_PERIOD).is_finite());
    }

    #[test]
    fn proportional_example() {
        assert_abs_diff_eq!(
            proportional_yield(0.8, 100.0, 0.18, 5.2 * 30.0 * 12.0),
            26_956.8,
            epsilon = 1e-6
        );
    }

    #[test]
    fn summary_means_and_sum() {
        let entries = vec![make_entry(2160.0, 5.0, 18.0), make_entry(1620.0, 4.0, 18.0)];
        let s = PerformanceSummary::from_series(&entries, 18.0);
        assert_abs_diff_eq!(s.total_energy, 3780.0, epsilon = 1e-9);
        // Yf = 4.0 and 3.0 -> PR 80% and 75%
        assert_abs_diff_eq!(s.avg_final_yield, 3.5, epsilon = 1e-9);
        assert_abs_diff_eq!(s.avg_reference_yield, 4.5, epsilon = 1e-9);
        assert_abs_diff_eq!(s.avg_performance_ratio, 77.5, epsilon = 1e-9);
        assert_abs_diff_eq!(s.capacity_utilization, 3780.0 / (18.0 * 2.0 * 720.0) * 100.0, epsilon = 1e-9);
        assert_eq!(s.computable_entries, 2);
    }

    #[test]
    fn non_computable_entries_excluded_from_means_but_counted_in_energy() {
        let entries = vec![make_entry(2160.0, 5.0, 18.0), make_entry(300.0, 0.0, 18.0)];
        let s = PerformanceSummary::from_series(&entries, 18.0);
        assert_abs_diff_eq!(s.total_energy, 2460.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.avg_performance_ratio, 80.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.avg_reference_yield, 5.0, epsilon = 1e-9);
        assert_eq!(s.entry_count, 2);
        assert_eq!(s.computable_entries, 1);
        assert!(s.avg_performance_ratio.is_finite());
    }

    #[test]
    fn empty_series_is_no_data() {
        let s = PerformanceSummary::from_series(&[], 18.0);
        assert!(!s.has_data());
        assert_eq!(s.total_energy, 0.0);
        assert!(format!("{s}").contains("No data"));
    }
}
