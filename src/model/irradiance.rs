//! Plane-of-array irradiance transposition.
//!
//! Combines the three measured irradiance components onto a tilted surface:
//! direct beam projected through the angle of incidence, isotropic sky
//! diffuse, and ground-reflected diffuse.

use crate::domain::WeatherSample;

use super::sun::{angle_of_incidence, SolarPosition};

/// Irradiance reaching a tilted plane (W/m²).
///
/// Returns 0 when the sun is below the horizon; the diffuse terms are
/// dropped there as well since the horizontal measurements at night are
/// noise-level.
pub fn plane_of_array_wm2(
    sample: &WeatherSample,
    sun: &SolarPosition,
    tilt_deg: f64,
    surface_azimuth_deg: f64,
    ground_albedo: f64,
) -> f64 {
    if !sun.is_above_horizon() {
        return 0.0;
    }

    let aoi_deg = angle_of_incidence(sun, tilt_deg, surface_azimuth_deg);
    let beam = sample.dni_wm2 * aoi_deg.to_radians().cos().max(0.0);

    let tilt_cos = tilt_deg.to_radians().cos();
    let sky_diffuse = sample.dhi_wm2 * (1.0 + tilt_cos) / 2.0;
    let ground_reflected = sample.ghi_wm2 * ground_albedo * (1.0 - tilt_cos) / 2.0;

    (beam + sky_diffuse + ground_reflected).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn daylight_sample() -> WeatherSample {
        WeatherSample {
            timestamp: FixedOffset::west_opt(5 * 3600)
                .unwrap()
                .with_ymd_and_hms(2023, 6, 24, 12, 0, 0)
                .unwrap(),
            temperature_c: 28.0,
            wind_speed_ms: 2.5,
            ghi_wm2: 820.0,
            dhi_wm2: 110.0,
            dni_wm2: 870.0,
        }
    }

    #[test]
    fn test_no_irradiance_below_horizon() {
        let sun = SolarPosition {
            elevation_deg: -5.0,
            azimuth_deg: 300.0,
        };
        assert_eq!(
            plane_of_array_wm2(&daylight_sample(), &sun, 32.0, 180.0, 0.2),
            0.0
        );
    }

    #[test]
    fn test_horizontal_plane_sees_no_ground_reflection() {
        let sun = SolarPosition {
            elevation_deg: 60.0,
            azimuth_deg: 180.0,
        };
        let sample = daylight_sample();
        let poa = plane_of_array_wm2(&sample, &sun, 0.0, 180.0, 0.2);

        // Flat plane: beam = dni * cos(zenith), full sky diffuse, no ground term.
        let expected = sample.dni_wm2 * 30f64.to_radians().cos() + sample.dhi_wm2;
        assert!((poa - expected).abs() < 1e-9, "poa {poa}, expected {expected}");
    }

    #[test]
    fn test_facing_the_sun_beats_facing_away() {
        let sun = SolarPosition {
            elevation_deg: 30.0,
            azimuth_deg: 90.0,
        };
        let sample = daylight_sample();
        let east = plane_of_array_wm2(&sample, &sun, 40.0, 90.0, 0.2);
        let west = plane_of_array_wm2(&sample, &sun, 40.0, 270.0, 0.2);
        assert!(east > west);
        // The west-facing plane still collects diffuse light.
        assert!(west > 0.0);
    }

    #[test]
    fn test_result_never_negative() {
        let sun = SolarPosition {
            elevation_deg: 2.0,
            azimuth_deg: 90.0,
        };
        let mut sample = daylight_sample();
        sample.dni_wm2 = 0.0;
        sample.dhi_wm2 = 0.0;
        sample.ghi_wm2 = 0.0;
        let poa = plane_of_array_wm2(&sample, &sun, 45.0, 270.0, 0.2);
        assert!(poa >= 0.0);
    }
}
