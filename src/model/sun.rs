//! Solar geometry.
//!
//! Simplified solar position model:
//! - Solar declination from day of year
//! - Hour angle from local solar time
//! - Elevation and azimuth from declination, latitude and hour angle

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use std::f64::consts::PI;

/// Sun position at one instant.
#[derive(Debug, Clone, Copy)]
pub struct SolarPosition {
    /// Angle above the horizon (degrees); negative below the horizon.
    pub elevation_deg: f64,
    /// Angle clockwise from north (degrees): 90 = east, 180 = south.
    pub azimuth_deg: f64,
}

impl SolarPosition {
    pub fn zenith_deg(&self) -> f64 {
        90.0 - self.elevation_deg
    }

    pub fn is_above_horizon(&self) -> bool {
        self.elevation_deg > 0.0
    }
}

/// Calculate the sun's elevation and azimuth for a timestamp and location.
///
/// The timestamp's own UTC offset is used to convert wall-clock time to
/// solar time, so the weather record's offset flows straight through.
pub fn solar_position(
    timestamp: DateTime<FixedOffset>,
    latitude_deg: f64,
    longitude_deg: f64,
) -> SolarPosition {
    let day_of_year = timestamp.ordinal() as f64;
    let hour = timestamp.hour() as f64 + timestamp.minute() as f64 / 60.0;
    let utc_offset_hours = timestamp.offset().local_minus_utc() as f64 / 3600.0;

    // Solar declination: -23.45° at winter solstice, +23.45° at summer solstice
    let declination_deg = 23.45 * (360.0 / 365.0 * (day_of_year + 284.0) * PI / 180.0).sin();
    let declination_rad = declination_deg.to_radians();
    let latitude_rad = latitude_deg.to_radians();

    // Hour angle: degrees of sun travel from solar noon, 15°/hour
    let solar_time = hour + longitude_deg / 15.0 - utc_offset_hours;
    let hour_angle_deg = 15.0 * (solar_time - 12.0);
    let hour_angle_rad = hour_angle_deg.to_radians();

    let elevation_sin = latitude_rad.sin() * declination_rad.sin()
        + latitude_rad.cos() * declination_rad.cos() * hour_angle_rad.cos();
    let elevation_rad = elevation_sin.clamp(-1.0, 1.0).asin();
    let elevation_deg = elevation_rad.to_degrees();

    let azimuth_cos = (declination_rad.sin() - latitude_rad.sin() * elevation_rad.sin())
        / (latitude_rad.cos() * elevation_rad.cos());
    let mut azimuth_deg = azimuth_cos.clamp(-1.0, 1.0).acos().to_degrees();

    // Afternoon: sun is in the western half of the sky
    if hour_angle_deg > 0.0 {
        azimuth_deg = 360.0 - azimuth_deg;
    }

    SolarPosition {
        elevation_deg,
        azimuth_deg,
    }
}

/// Angle of incidence between the sun and a tilted surface normal (degrees).
///
/// `surface_azimuth_deg` follows the same clockwise-from-north convention as
/// the solar azimuth. Values beyond 90° mean the sun is behind the plane.
pub fn angle_of_incidence(sun: &SolarPosition, tilt_deg: f64, surface_azimuth_deg: f64) -> f64 {
    let zenith_rad = sun.zenith_deg().to_radians();
    let tilt_rad = tilt_deg.to_radians();
    let azimuth_delta_rad = (sun.azimuth_deg - surface_azimuth_deg).to_radians();

    let cos_aoi = zenith_rad.cos() * tilt_rad.cos()
        + zenith_rad.sin() * tilt_rad.sin() * azimuth_delta_rad.cos();

    cos_aoi.clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // West Lafayette, Indiana, UTC-5 in summer
    const LAT: f64 = 40.43093;
    const LONG: f64 = -86.911617;

    fn at(hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2023, 6, 24, hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_midday_sun_high_and_southern() {
        // Solar noon is around 13:45 local at this longitude/offset
        let sun = solar_position(at(13), LAT, LONG);
        assert!(sun.elevation_deg > 60.0, "elevation {}", sun.elevation_deg);
        assert!(
            sun.azimuth_deg > 120.0 && sun.azimuth_deg < 240.0,
            "azimuth {}",
            sun.azimuth_deg
        );
    }

    #[test]
    fn test_midnight_sun_below_horizon() {
        let sun = solar_position(at(0), LAT, LONG);
        assert!(!sun.is_above_horizon());
    }

    #[test]
    fn test_morning_sun_in_the_east() {
        let sun = solar_position(at(8), LAT, LONG);
        assert!(sun.is_above_horizon());
        assert!(
            sun.azimuth_deg > 45.0 && sun.azimuth_deg < 135.0,
            "azimuth {}",
            sun.azimuth_deg
        );
    }

    #[test]
    fn test_aoi_zero_for_sun_along_normal() {
        // Sun at 50° elevation due south; surface tilted 40° facing south
        // puts its normal straight at the sun.
        let sun = SolarPosition {
            elevation_deg: 50.0,
            azimuth_deg: 180.0,
        };
        let aoi = angle_of_incidence(&sun, 40.0, 180.0);
        assert!(aoi.abs() < 0.01, "aoi {aoi}");
    }

    #[test]
    fn test_aoi_beyond_90_when_sun_behind_plane() {
        // Sun low in the east, surface facing west
        let sun = SolarPosition {
            elevation_deg: 10.0,
            azimuth_deg: 90.0,
        };
        let aoi = angle_of_incidence(&sun, 90.0, 270.0);
        assert!(aoi > 90.0, "aoi {aoi}");
    }

    #[test]
    fn test_horizontal_surface_aoi_equals_zenith() {
        let sun = SolarPosition {
            elevation_deg: 35.0,
            azimuth_deg: 140.0,
        };
        let aoi = angle_of_incidence(&sun, 0.0, 180.0);
        assert!((aoi - sun.zenith_deg()).abs() < 0.01);
    }
}
