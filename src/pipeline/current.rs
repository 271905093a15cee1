//! DC current derivation from the total DC power series.

use crate::domain::{CurrentSeries, SystemTotal};
use crate::error::PipelineError;

/// Convert the total DC power series into a current series at a fixed
/// nominal bus voltage.
///
/// Element-wise division only: no smoothing, clamping, or sign correction.
/// Negative DC power would propagate as negative current for downstream
/// consumers to flag.
pub fn to_current(total: &SystemTotal, nominal_voltage: f64) -> Result<CurrentSeries, PipelineError> {
    if !nominal_voltage.is_finite() || nominal_voltage <= 0.0 {
        return Err(PipelineError::Configuration(format!(
            "nominal voltage must be > 0 V, got {nominal_voltage}"
        )));
    }

    let amps = total
        .dc_watts()
        .iter()
        .map(|&dc_watts| dc_watts / nominal_voltage)
        .collect();

    Ok(CurrentSeries::new(total.timestamps().to_vec(), amps))
}
