//! Solar declination and sunset hour angle for a site and day of year.

use std::f64::consts::PI;

use serde::Serialize;

/// Maximum solar declination magnitude (degrees), the Earth's axial tilt.
pub const MAX_DECLINATION_DEG: f64 = 23.45;

/// Days per year used by the declination approximation.
const DAYS_PER_YEAR: f64 = 365.0;

/// Day offset in Cooper's declination formula.
const DECLINATION_DAY_OFFSET: f64 = 284.0;

/// Solar geometry derived from a `(latitude, day_of_year)` pair.
///
/// Never stored; recomputed for every calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarGeometryResult {
    /// Solar declination angle (degrees).
    pub declination_deg: f64,
    /// Sunset hour angle (radians), in `[0, π]`.
    pub sunset_hour_angle_rad: f64,
    /// Sunset hour angle (degrees), in `[0, 180]`.
    pub sunset_hour_angle_deg: f64,
}

impl SolarGeometryResult {
    /// Day length in hours implied by the sunset hour angle (15° per hour).
    pub fn day_length_hours(&self) -> f64 {
        2.0 * self.sunset_hour_angle_deg / 15.0
    }
}

/// Solar declination (degrees) for a day of year, per Cooper (1969).
///
/// `δ = 23.45 · sin(2π/365 · (284 + n))`
pub fn declination_deg(day_of_year: u32) -> f64 {
    let n = f64::from(day_of_year);
    MAX_DECLINATION_DEG * (2.0 * PI / DAYS_PER_YEAR * (DECLINATION_DAY_OFFSET + n)).sin()
}

/// Cosine of the sunset hour angle, `-tan(φ)·tan(δ)`, clamped to `[-1, 1]`.
///
/// Above the polar circles the raw value leaves the arccos domain (polar day
/// or polar night); clamping maps those to `ωs = π` and `ωs = 0`. A NaN
/// argument (non-finite latitude) is treated as the equatorial case.
pub fn sunset_cos_argument(latitude_deg: f64, declination_deg: f64) -> f64 {
    let raw = -latitude_deg.to_radians().tan() * declination_deg.to_radians().tan();
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(-1.0, 1.0)
}

/// Computes declination and sunset hour angle for a site and day.
///
/// Infallible: degenerate latitudes are absorbed by clamping the arccos
/// argument.
///
/// # Arguments
///
/// * `latitude_deg` - Site latitude (degrees, north positive)
/// * `day_of_year` - Day number, 1 = January 1st
///
/// # Examples
///
/// ```
/// use pv_yield::model::geometry::compute_geometry;
///
/// let g = compute_geometry(0.0, 80);
/// assert!((g.sunset_hour_angle_deg - 90.0).abs() < 1e-9);
/// ```
pub fn compute_geometry(latitude_deg: f64, day_of_year: u32) -> SolarGeometryResult {
    let declination = declination_deg(day_of_year);
    let sunset_rad = sunset_cos_argument(latitude_deg, declination).acos();
    SolarGeometryResult {
        declination_deg: declination,
        sunset_hour_angle_rad: sunset_rad,
        sunset_hour_angle_deg: sunset_rad.to_degrees(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn declination_near_solstices() {
        // Day 172 ≈ June 21, day 355 ≈ December 21
        assert_abs_diff_eq!(declination_deg(172), 23.45, epsilon = 0.01);
        assert_abs_diff_eq!(declination_deg(355), -23.45, epsilon = 0.01);
    }

    #[test]
    fn declination_near_zero_at_equinox() {
        assert!(declination_deg(81).abs() < 0.5);
    }

    #[test]
    fn equator_has_twelve_hour_day() {
        for n in [1, 100, 172, 300, 365] {
            let g = compute_geometry(0.0, n);
            assert_abs_diff_eq!(g.sunset_hour_angle_deg, 90.0, epsilon = 1e-9);
            assert_abs_diff_eq!(g.day_length_hours(), 12.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn northern_summer_days_are_longer() {
        let summer = compute_geometry(21.0, 172);
        let winter = compute_geometry(21.0, 355);
        assert!(summer.sunset_hour_angle_deg > 90.0);
        assert!(winter.sunset_hour_angle_deg < 90.0);
    }

    #[test]
    fn polar_day_and_night_are_clamped() {
        let midsummer = compute_geometry(80.0, 172);
        assert_abs_diff_eq!(midsummer.sunset_hour_angle_rad, PI, epsilon = 1e-12);
        assert_abs_diff_eq!(midsummer.sunset_hour_angle_deg, 180.0, epsilon = 1e-9);

        let midwinter = compute_geometry(80.0, 355);
        assert_eq!(midwinter.sunset_hour_angle_rad, 0.0);
    }

    #[test]
    fn pole_latitude_does_not_produce_nan() {
        let g = compute_geometry(90.0, 10);
        assert!(g.sunset_hour_angle_rad.is_finite());
        let g = compute_geometry(-90.0, 10);
        assert!(g.sunset_hour_angle_rad.is_finite());
    }

    #[test]
    fn nan_latitude_falls_back_to_equator() {
        let g = compute_geometry(f64::NAN, 10);
        assert_abs_diff_eq!(g.sunset_hour_angle_deg, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn radian_and_degree_forms_agree() {
        let g = compute_geometry(10.8, 15);
        assert_abs_diff_eq!(
            g.sunset_hour_angle_rad.to_degrees(),
            g.sunset_hour_angle_deg,
            epsilon = 1e-12
        );
    }
}
