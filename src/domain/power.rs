//! Modeled power and current series.
//!
//! All series here carry their own copy of the time index so the report sink
//! can consume them independently of the weather record they were derived
//! from.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::weather::WeatherSeries;

/// Instantaneous model output for one timestamp.
///
/// `dc_watts` is non-negative by construction of the model; `ac_watts` may be
/// zero while `dc_watts` is not, when the inverter is below its start-up
/// threshold.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PowerSample {
    pub timestamp: DateTime<FixedOffset>,
    pub dc_watts: f64,
    pub ac_watts: f64,
}

/// One segment's modeled output, aligned 1:1 with the weather index it was
/// computed from.
#[derive(Debug, Clone)]
pub struct SegmentResult {
    samples: Vec<PowerSample>,
}

impl SegmentResult {
    pub fn new(samples: Vec<PowerSample>) -> Self {
        Self { samples }
    }

    /// The fail-soft contribution: zero power at every weather timestamp.
    pub fn zero(weather: &WeatherSeries) -> Self {
        Self {
            samples: weather
                .timestamps()
                .map(|timestamp| PowerSample {
                    timestamp,
                    dc_watts: 0.0,
                    ac_watts: 0.0,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[PowerSample] {
        &self.samples
    }

    /// True when this result carries exactly the weather record's index:
    /// same length and identical timestamps, not just equal length.
    pub fn aligns_with(&self, weather: &WeatherSeries) -> bool {
        self.samples.len() == weather.len()
            && self
                .samples
                .iter()
                .zip(weather.timestamps())
                .all(|(sample, ts)| sample.timestamp == ts)
    }
}

/// System-level DC and AC totals on the shared weather index.
#[derive(Debug, Clone, Serialize)]
pub struct SystemTotal {
    timestamps: Vec<DateTime<FixedOffset>>,
    dc_watts: Vec<f64>,
    ac_watts: Vec<f64>,
}

impl SystemTotal {
    pub(crate) fn new(
        timestamps: Vec<DateTime<FixedOffset>>,
        dc_watts: Vec<f64>,
        ac_watts: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(timestamps.len(), dc_watts.len());
        debug_assert_eq!(timestamps.len(), ac_watts.len());
        Self {
            timestamps,
            dc_watts,
            ac_watts,
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<FixedOffset>] {
        &self.timestamps
    }

    pub fn dc_watts(&self) -> &[f64] {
        &self.dc_watts
    }

    pub fn ac_watts(&self) -> &[f64] {
        &self.ac_watts
    }
}

/// DC current derived from the total DC power series, one value per
/// timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentSeries {
    timestamps: Vec<DateTime<FixedOffset>>,
    amps: Vec<f64>,
}

impl CurrentSeries {
    pub(crate) fn new(timestamps: Vec<DateTime<FixedOffset>>, amps: Vec<f64>) -> Self {
        debug_assert_eq!(timestamps.len(), amps.len());
        Self { timestamps, amps }
    }

    pub fn len(&self) -> usize {
        self.amps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<FixedOffset>] {
        &self.timestamps
    }

    pub fn amps(&self) -> &[f64] {
        &self.amps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::weather::WeatherSample;
    use chrono::{Duration, FixedOffset, TimeZone};

    fn weather_of(hours: &[u32]) -> WeatherSeries {
        let samples = hours
            .iter()
            .map(|&h| WeatherSample {
                timestamp: FixedOffset::west_opt(5 * 3600)
                    .unwrap()
                    .with_ymd_and_hms(2023, 6, 24, h, 0, 0)
                    .unwrap(),
                temperature_c: 20.0,
                wind_speed_ms: 1.0,
                ghi_wm2: 500.0,
                dhi_wm2: 100.0,
                dni_wm2: 600.0,
            })
            .collect();
        WeatherSeries::new(samples, Duration::hours(1)).unwrap()
    }

    #[test]
    fn test_zero_result_matches_weather_index() {
        let weather = weather_of(&[9, 10, 11]);
        let zero = SegmentResult::zero(&weather);
        assert_eq!(zero.len(), 3);
        assert!(zero.aligns_with(&weather));
        assert!(zero.samples().iter().all(|s| s.dc_watts == 0.0));
        assert!(zero.samples().iter().all(|s| s.ac_watts == 0.0));
    }

    #[test]
    fn test_alignment_requires_identical_timestamps() {
        let weather = weather_of(&[9, 10, 11]);
        let shifted = weather_of(&[10, 11, 12]);

        // Same length, different index: must not count as aligned.
        let result = SegmentResult::zero(&shifted);
        assert_eq!(result.len(), weather.len());
        assert!(!result.aligns_with(&weather));
    }

    #[test]
    fn test_alignment_requires_same_length() {
        let weather = weather_of(&[9, 10, 11]);
        let short = weather_of(&[9, 10]);
        assert!(!SegmentResult::zero(&short).aligns_with(&weather));
    }
}
