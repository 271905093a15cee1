use anyhow::Result;
use chrono::{Duration, NaiveDateTime};
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::PipelineError;
use crate::ingest::{WeatherRequest, TIMESTAMP_FORMAT};
use crate::model::{CellTempParams, InverterParams, ModuleParams, Site};
use crate::domain::SegmentSpec;

/// One run's immutable configuration: the weather slice, the site, the
/// module/inverter tables and the installation's segments.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub weather: WeatherConfig,
    pub site: Site,
    pub module: ModuleParams,
    #[serde(default)]
    pub cell_temperature: CellTempParams,
    pub inverter: InverterParams,
    pub electrical: ElectricalConfig,
    pub histogram: HistogramConfig,
    #[serde(default)]
    pub report: ReportConfig,
    pub segments: Vec<SegmentSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    pub csv_path: PathBuf,
    /// Local wall-clock range, "%Y-%m-%d %H:%M:%S", inclusive start.
    pub range_start: String,
    /// Exclusive end of the range, same format.
    pub range_end: String,
    pub sample_interval_minutes: u32,
}

impl WeatherConfig {
    pub fn request(&self) -> Result<WeatherRequest, PipelineError> {
        let parse = |label: &str, raw: &str| {
            NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|e| {
                PipelineError::Configuration(format!("bad {label} {raw:?}: {e}"))
            })
        };
        Ok(WeatherRequest {
            start: parse("range_start", &self.range_start)?,
            end: parse("range_end", &self.range_end)?,
            sample_interval: Duration::minutes(self.sample_interval_minutes as i64),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElectricalConfig {
    /// Nominal DC bus voltage used to convert power to current (V).
    pub nominal_voltage_v: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistogramConfig {
    pub bin_width_amps: f64,
    pub bin_count: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    /// When set, the full series and histogram are also written here as JSON.
    pub json_path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("PVDUTY__").split("__"));
        Ok(figment.extract()?)
    }

    /// Surface every configuration error before any computation starts.
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.weather.request()?;
        if self.weather.sample_interval_minutes == 0 {
            return Err(PipelineError::Configuration(
                "sample_interval_minutes must be at least 1".to_string(),
            ));
        }

        if !(-90.0..=90.0).contains(&self.site.latitude_deg) {
            return Err(PipelineError::Configuration(format!(
                "latitude must be within [-90, 90], got {}",
                self.site.latitude_deg
            )));
        }
        if !(-180.0..=180.0).contains(&self.site.longitude_deg) {
            return Err(PipelineError::Configuration(format!(
                "longitude must be within [-180, 180], got {}",
                self.site.longitude_deg
            )));
        }
        if !(0.0..=1.0).contains(&self.site.albedo) {
            return Err(PipelineError::Configuration(format!(
                "albedo must be within [0, 1], got {}",
                self.site.albedo
            )));
        }

        if !self.module.pdc0_w.is_finite() || self.module.pdc0_w <= 0.0 {
            return Err(PipelineError::Configuration(format!(
                "module pdc0 must be > 0 W, got {}",
                self.module.pdc0_w
            )));
        }
        if !self.module.gamma_pdc_per_c.is_finite() {
            return Err(PipelineError::Configuration(
                "module gamma_pdc must be finite".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.inverter.nominal_efficiency)
            || self.inverter.nominal_efficiency == 0.0
        {
            return Err(PipelineError::Configuration(format!(
                "inverter efficiency must be within (0, 1], got {}",
                self.inverter.nominal_efficiency
            )));
        }
        if !(0.0..1.0).contains(&self.inverter.startup_fraction) {
            return Err(PipelineError::Configuration(format!(
                "inverter startup fraction must be within [0, 1), got {}",
                self.inverter.startup_fraction
            )));
        }

        if !self.electrical.nominal_voltage_v.is_finite()
            || self.electrical.nominal_voltage_v <= 0.0
        {
            return Err(PipelineError::Configuration(format!(
                "nominal voltage must be > 0 V, got {}",
                self.electrical.nominal_voltage_v
            )));
        }

        if !self.histogram.bin_width_amps.is_finite() || self.histogram.bin_width_amps <= 0.0 {
            return Err(PipelineError::Configuration(format!(
                "histogram bin width must be > 0 A, got {}",
                self.histogram.bin_width_amps
            )));
        }
        if self.histogram.bin_count == 0 {
            return Err(PipelineError::Configuration(
                "histogram bin count must be at least 1".to_string(),
            ));
        }

        if self.segments.is_empty() {
            return Err(PipelineError::Configuration(
                "at least one segment must be configured".to_string(),
            ));
        }
        for segment in &self.segments {
            segment.validate()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            weather: WeatherConfig {
                csv_path: PathBuf::from("HistoricalWeather.csv"),
                range_start: "2023-06-24 14:00:00".to_string(),
                range_end: "2023-06-25 14:00:00".to_string(),
                sample_interval_minutes: 60,
            },
            site: Site {
                latitude_deg: 40.43093,
                longitude_deg: -86.911617,
                albedo: 0.2,
            },
            module: ModuleParams {
                pdc0_w: 325.0,
                gamma_pdc_per_c: -0.00258,
            },
            cell_temperature: CellTempParams::default(),
            inverter: InverterParams {
                nominal_efficiency: 0.96,
                startup_fraction: 0.01,
            },
            electrical: ElectricalConfig {
                nominal_voltage_v: 400.0,
            },
            histogram: HistogramConfig {
                bin_width_amps: 2.0,
                bin_count: 20,
            },
            report: ReportConfig::default(),
            segments: vec![SegmentSpec {
                tilt_deg: 32.0,
                azimuth_deg: 90.0,
                module_count: 3,
                dc_rating_w: 975.0,
            }],
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_weather_request_parses_range() {
        let request = valid_config().weather.request().unwrap();
        assert!(request.start < request.end);
        assert_eq!(request.sample_interval, Duration::hours(1));
    }

    #[test]
    fn test_bad_range_string_rejected() {
        let mut cfg = valid_config();
        cfg.weather.range_start = "24/06/2023".to_string();
        assert!(matches!(
            cfg.validate(),
            Err(PipelineError::Configuration(_))
        ));
    }

    #[test]
    fn test_zero_voltage_rejected() {
        let mut cfg = valid_config();
        cfg.electrical.nominal_voltage_v = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_bad_histogram_geometry_rejected() {
        let mut cfg = valid_config();
        cfg.histogram.bin_width_amps = -1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = valid_config();
        cfg.histogram.bin_count = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_empty_segment_list_rejected() {
        let mut cfg = valid_config();
        cfg.segments.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_invalid_segment_rejected() {
        let mut cfg = valid_config();
        cfg.segments[0].dc_rating_w = -1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_invalid_site_rejected() {
        let mut cfg = valid_config();
        cfg.site.latitude_deg = 91.0;
        assert!(cfg.validate().is_err());

        let mut cfg = valid_config();
        cfg.site.albedo = 1.5;
        assert!(cfg.validate().is_err());
    }
}
