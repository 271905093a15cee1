//! Per-segment power modeling.
//!
//! The pipeline consumes the [`PowerModel`] trait; [`ArrayPowerModel`] is the
//! standard implementation: solar position → plane-of-array irradiance →
//! SAPM cell temperature → PVWatts DC → nominal-efficiency AC.

use serde::Deserialize;
use tracing::debug;

use crate::domain::{PowerSample, SegmentResult, SegmentSpec, WeatherSample, WeatherSeries};
use crate::error::ModelError;

pub mod irradiance;
pub mod pvwatts;
pub mod sun;

pub use pvwatts::{CellTempParams, InverterParams, ModuleParams};

/// Site geometry shared by every segment.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Site {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    /// Ground reflectance seen by tilted planes.
    pub albedo: f64,
}

/// Converts one segment plus a weather record into an aligned DC/AC power
/// series.
///
/// Implementations must be deterministic for identical inputs and must
/// return a result aligned 1:1 with `weather`, or an explicit error.
#[cfg_attr(test, mockall::automock)]
pub trait PowerModel {
    fn run(
        &self,
        segment: &SegmentSpec,
        weather: &WeatherSeries,
    ) -> Result<SegmentResult, ModelError>;
}

/// The standard per-segment model.
#[derive(Debug, Clone)]
pub struct ArrayPowerModel {
    site: Site,
    module: ModuleParams,
    cell_temp: CellTempParams,
    inverter: InverterParams,
}

impl ArrayPowerModel {
    pub fn new(
        site: Site,
        module: ModuleParams,
        cell_temp: CellTempParams,
        inverter: InverterParams,
    ) -> Self {
        Self {
            site,
            module,
            cell_temp,
            inverter,
        }
    }

    fn model_sample(&self, segment: &SegmentSpec, sample: &WeatherSample) -> PowerSample {
        let sun = sun::solar_position(
            sample.timestamp,
            self.site.latitude_deg,
            self.site.longitude_deg,
        );
        let poa_wm2 = irradiance::plane_of_array_wm2(
            sample,
            &sun,
            segment.tilt_deg,
            segment.azimuth_deg,
            self.site.albedo,
        );
        let cell_temp_c = pvwatts::cell_temperature_c(
            poa_wm2,
            sample.temperature_c,
            sample.wind_speed_ms,
            &self.cell_temp,
        );

        // The array nameplate comes from the module table; the segment's DC
        // rating bounds the inverter side.
        let pdc0_w = segment.module_count as f64 * self.module.pdc0_w;
        let dc_watts =
            pvwatts::dc_power_w(poa_wm2, cell_temp_c, pdc0_w, self.module.gamma_pdc_per_c);
        let ac_watts = pvwatts::ac_power_w(dc_watts, segment.dc_rating_w, &self.inverter);

        PowerSample {
            timestamp: sample.timestamp,
            dc_watts,
            ac_watts,
        }
    }
}

impl PowerModel for ArrayPowerModel {
    fn run(
        &self,
        segment: &SegmentSpec,
        weather: &WeatherSeries,
    ) -> Result<SegmentResult, ModelError> {
        segment
            .validate()
            .map_err(|e| ModelError::InvalidSegment(e.to_string()))?;

        let mut samples = Vec::with_capacity(weather.len());
        for sample in weather.samples() {
            check_finite(sample)?;
            samples.push(self.model_sample(segment, sample));
        }

        debug!(segment = %segment, samples = samples.len(), "segment modeled");
        Ok(SegmentResult::new(samples))
    }
}

/// NaN or infinite weather inputs would otherwise flow silently into the
/// power series; surface them as an explicit model error instead.
fn check_finite(sample: &WeatherSample) -> Result<(), ModelError> {
    let fields: [(&'static str, f64); 5] = [
        ("temperature", sample.temperature_c),
        ("wind_speed", sample.wind_speed_ms),
        ("ghi", sample.ghi_wm2),
        ("dhi", sample.dhi_wm2),
        ("dni", sample.dni_wm2),
    ];
    for (field, value) in fields {
        if !value.is_finite() {
            return Err(ModelError::NonFiniteInput {
                timestamp: sample.timestamp,
                field,
            });
        }
    }
    Ok(())
}
