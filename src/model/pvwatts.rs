//! PVWatts-style DC and AC power conversion.
//!
//! Cell temperature uses the SAPM exponential model; DC power derates
//! linearly with cell temperature above 25 °C and is clamped at zero. The
//! formulation is division-free, so a cold, dark sample cannot produce a
//! zero-division.

use serde::Deserialize;

/// Module electrical parameters shared by every segment.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ModuleParams {
    /// Per-module DC rating at standard test conditions (W).
    pub pdc0_w: f64,
    /// Power temperature coefficient (1/°C), typically negative.
    pub gamma_pdc_per_c: f64,
}

/// SAPM cell temperature coefficients.
///
/// Defaults are the open-rack glass/glass mount.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CellTempParams {
    pub a: f64,
    pub b: f64,
    pub delta_t_c: f64,
}

impl Default for CellTempParams {
    fn default() -> Self {
        Self {
            a: -3.47,
            b: -0.0594,
            delta_t_c: 3.0,
        }
    }
}

/// Inverter conversion parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct InverterParams {
    /// Nominal DC→AC conversion efficiency (0, 1].
    pub nominal_efficiency: f64,
    /// Fraction of the segment DC rating below which the inverter does not
    /// start and AC output is zero.
    pub startup_fraction: f64,
}

/// SAPM cell temperature (°C) from plane-of-array irradiance, air
/// temperature and wind speed.
pub fn cell_temperature_c(
    poa_wm2: f64,
    air_temp_c: f64,
    wind_speed_ms: f64,
    params: &CellTempParams,
) -> f64 {
    let back_surface_c = poa_wm2 * (params.a + params.b * wind_speed_ms).exp() + air_temp_c;
    back_surface_c + poa_wm2 / 1000.0 * params.delta_t_c
}

/// PVWatts DC power (W) for an array with nameplate rating `pdc0_w`.
///
/// Clamped at zero: severe temperature derating can never drive the modeled
/// array negative.
pub fn dc_power_w(poa_wm2: f64, cell_temp_c: f64, pdc0_w: f64, gamma_pdc_per_c: f64) -> f64 {
    let derate = 1.0 + gamma_pdc_per_c * (cell_temp_c - 25.0);
    (poa_wm2 / 1000.0 * pdc0_w * derate).max(0.0)
}

/// AC power (W) through a nominal-efficiency inverter whose AC limit equals
/// the segment's DC rating.
pub fn ac_power_w(dc_watts: f64, dc_rating_w: f64, params: &InverterParams) -> f64 {
    if dc_watts < params.startup_fraction * dc_rating_w {
        return 0.0;
    }
    (dc_watts * params.nominal_efficiency).min(dc_rating_w)
}
