//! End-to-end tests of the hourly calculation mode.

mod common;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use pv_yield::model::engine::DayInput;
use pv_yield::model::types::CalcMode;

#[test]
fn hcmc_january_day_total() {
    let result = common::default_engine().hourly(&common::hcmc_january());

    assert_eq!(result.mode(), CalcMode::Hourly);
    assert_eq!(result.series().len(), 24);
    // 100 m² at 18 % with ~5.2 kWh/m² and moderate thermal loss
    assert!(result.total_energy() > 80.0 && result.total_energy() < 93.6);
    assert_abs_diff_eq!(result.total_energy(), 85.407, epsilon = 0.01);
}

#[test]
fn hcmc_january_geometry_is_reported() {
    let result = common::default_engine().hourly(&common::hcmc_january());
    let Some(g) = result.geometry() else {
        panic!("hourly result should carry its geometry");
    };
    assert_abs_diff_eq!(g.declination_deg, -21.269, epsilon = 1e-3);
    assert_abs_diff_eq!(g.sunset_hour_angle_deg, 85.741, epsilon = 1e-3);
}

#[test]
fn night_hours_are_zero_and_noon_is_peak() {
    let result = common::default_engine().hourly(&common::hcmc_january());
    let samples = result.hourly_samples().expect("hourly result");
    assert_eq!(samples.len(), 24);

    for s in samples.iter().filter(|s| s.hour < 6 || s.hour > 18) {
        assert_eq!(s.energy, 0.0, "hour {} should be dark", s.hour);
        assert_eq!(s.irradiance, 0.0);
    }
    let peak = samples
        .iter()
        .max_by(|a, b| a.energy.total_cmp(&b.energy))
        .map(|s| s.hour);
    assert!(matches!(peak, Some(11) | Some(12)));
}

#[test]
fn total_equals_sum_of_samples() {
    let result = common::default_engine().hourly(&common::hcmc_january());
    let sum: f64 = result
        .hourly_samples()
        .expect("hourly result")
        .iter()
        .map(|s| s.energy)
        .sum();
    assert_relative_eq!(result.total_energy(), sum, max_relative = 1e-12);
}

#[test]
fn polar_night_produces_nothing() {
    let day = DayInput {
        daily_irradiance: 1.0,
        ambient_temp: -10.0,
        latitude: 80.0,
        day_of_year: 355,
    };
    let result = common::default_engine().hourly(&day);
    assert_eq!(result.series().len(), 24);
    assert_eq!(result.total_energy(), 0.0);
}

#[test]
fn zero_irradiance_day_is_all_zero() {
    let day = DayInput {
        daily_irradiance: 0.0,
        ..common::hcmc_january()
    };
    let result = common::default_engine().hourly(&day);
    assert_eq!(result.total_energy(), 0.0);
    let samples = result.hourly_samples().expect("hourly result");
    assert_eq!(samples.len(), 24);
    assert!(samples.iter().all(|s| s.energy == 0.0));
}

#[test]
fn hotter_day_yields_less() {
    let engine = common::default_engine();
    let mild = engine.hourly(&common::hcmc_january());
    let hot = engine.hourly(&DayInput {
        ambient_temp: 40.0,
        ..common::hcmc_january()
    });
    assert!(hot.total_energy() < mild.total_energy());
}
