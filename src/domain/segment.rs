//! Static description of the installation's sub-arrays.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PipelineError;

/// One physically distinct sub-array with uniform tilt, azimuth and rating.
///
/// Defined once at configuration time and never mutated; independent of any
/// weather record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSpec {
    /// Tilt from horizontal, 0 = flat, 90 = vertical.
    pub tilt_deg: f64,
    /// Surface azimuth, degrees clockwise from north (90 = east, 180 = south).
    pub azimuth_deg: f64,
    /// Number of modules in the segment.
    pub module_count: u32,
    /// Nameplate DC rating of the whole segment (W).
    pub dc_rating_w: f64,
}

impl SegmentSpec {
    /// Check the physical parameter ranges.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.tilt_deg.is_finite() || !(0.0..=90.0).contains(&self.tilt_deg) {
            return Err(PipelineError::Configuration(format!(
                "segment tilt must be within [0, 90] degrees, got {}",
                self.tilt_deg
            )));
        }
        if !self.azimuth_deg.is_finite() || !(0.0..360.0).contains(&self.azimuth_deg) {
            return Err(PipelineError::Configuration(format!(
                "segment azimuth must be within [0, 360) degrees, got {}",
                self.azimuth_deg
            )));
        }
        if self.module_count < 1 {
            return Err(PipelineError::Configuration(
                "segment must contain at least one module".to_string(),
            ));
        }
        if !self.dc_rating_w.is_finite() || self.dc_rating_w <= 0.0 {
            return Err(PipelineError::Configuration(format!(
                "segment DC rating must be > 0 W, got {}",
                self.dc_rating_w
            )));
        }
        Ok(())
    }
}

impl fmt::Display for SegmentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} modules, {:.0} W at {:.0}°/{:.0}°",
            self.module_count, self.dc_rating_w, self.tilt_deg, self.azimuth_deg
        )
    }
}
