//! Canonical time-indexed weather record.
//!
//! A [`WeatherSeries`] is validated once on construction and immutable
//! afterwards; it lives for exactly one modeling run.

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// One weather observation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeatherSample {
    pub timestamp: DateTime<FixedOffset>,
    pub temperature_c: f64,
    pub wind_speed_ms: f64,
    /// Global horizontal irradiance (W/m²)
    pub ghi_wm2: f64,
    /// Diffuse horizontal irradiance (W/m²)
    pub dhi_wm2: f64,
    /// Direct normal irradiance (W/m²)
    pub dni_wm2: f64,
}

/// Ordered weather record sharing one UTC offset.
#[derive(Debug, Clone)]
pub struct WeatherSeries {
    samples: Vec<WeatherSample>,
    sample_interval: Duration,
}

impl WeatherSeries {
    /// Validate and seal a weather record.
    ///
    /// Timestamps must be strictly increasing with no gap larger than
    /// `sample_interval`. Violations are data-quality errors, never repaired
    /// here.
    pub fn new(
        samples: Vec<WeatherSample>,
        sample_interval: Duration,
    ) -> Result<Self, PipelineError> {
        if samples.is_empty() {
            return Err(PipelineError::DataQuality(
                "weather record contains no samples".to_string(),
            ));
        }
        if sample_interval <= Duration::zero() {
            return Err(PipelineError::Configuration(
                "sample interval must be positive".to_string(),
            ));
        }

        for pair in samples.windows(2) {
            let gap = pair[1].timestamp - pair[0].timestamp;
            if gap <= Duration::zero() {
                return Err(PipelineError::DataQuality(format!(
                    "timestamps not strictly increasing at {}",
                    pair[1].timestamp
                )));
            }
            if gap > sample_interval {
                return Err(PipelineError::DataQuality(format!(
                    "gap of {} minutes after {} exceeds the {}-minute sampling interval",
                    gap.num_minutes(),
                    pair[0].timestamp,
                    sample_interval.num_minutes()
                )));
            }
        }

        Ok(Self {
            samples,
            sample_interval,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[WeatherSample] {
        &self.samples
    }

    pub fn sample_interval(&self) -> Duration {
        self.sample_interval
    }

    /// The shared time index.
    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<FixedOffset>> + '_ {
        self.samples.iter().map(|s| s.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_at(hour: u32, minute: u32) -> WeatherSample {
        let ts = FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2023, 6, 24, hour, minute, 0)
            .unwrap();
        WeatherSample {
            timestamp: ts,
            temperature_c: 25.0,
            wind_speed_ms: 2.0,
            ghi_wm2: 600.0,
            dhi_wm2: 120.0,
            dni_wm2: 700.0,
        }
    }

    #[test]
    fn test_valid_hourly_record() {
        let series = WeatherSeries::new(
            vec![sample_at(10, 0), sample_at(11, 0), sample_at(12, 0)],
            Duration::hours(1),
        )
        .unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.sample_interval(), Duration::hours(1));
    }

    #[test]
    fn test_empty_record_is_a_data_error() {
        let err = WeatherSeries::new(vec![], Duration::hours(1)).unwrap_err();
        assert!(matches!(err, PipelineError::DataQuality(_)));
    }

    #[test]
    fn test_duplicate_timestamp_rejected() {
        let err = WeatherSeries::new(
            vec![sample_at(10, 0), sample_at(10, 0)],
            Duration::hours(1),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::DataQuality(_)));
    }

    #[test]
    fn test_out_of_order_timestamps_rejected() {
        let err = WeatherSeries::new(
            vec![sample_at(11, 0), sample_at(10, 0)],
            Duration::hours(1),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::DataQuality(_)));
    }

    #[test]
    fn test_oversized_gap_rejected() {
        // 10:00 -> 12:00 with a declared one-hour interval
        let err = WeatherSeries::new(
            vec![sample_at(10, 0), sample_at(12, 0)],
            Duration::hours(1),
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("gap"), "unexpected message: {msg}");
    }

    #[test]
    fn test_sub_interval_spacing_is_allowed() {
        // Denser than declared is fine; only gaps beyond the interval are errors.
        let series = WeatherSeries::new(
            vec![sample_at(10, 0), sample_at(10, 30), sample_at(11, 30)],
            Duration::hours(1),
        );
        assert!(series.is_ok());
    }
}
