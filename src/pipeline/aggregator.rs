//! System-level aggregation of per-segment model results.

use tracing::{info, warn};

use crate::domain::{SegmentResult, SegmentSpec, SystemTotal, WeatherSeries};
use crate::error::PipelineError;
use crate::model::PowerModel;

/// Model every segment once and sum the results into system totals.
///
/// Failure policy:
/// - a segment whose model invocation fails contributes zero power at every
///   weather timestamp; the failure is logged as a warning and the run
///   continues (one bad segment must not suppress an otherwise valid total),
/// - a result that does not carry the weather record's exact timestamp index
///   is an alignment error and aborts the run; summation over mismatched
///   indices would be meaningless and is never repaired by truncation or
///   reindexing.
///
/// The model is invoked exactly once per segment; the single result feeds
/// both the DC and the AC totals.
pub fn aggregate(
    segments: &[SegmentSpec],
    weather: &WeatherSeries,
    model: &dyn PowerModel,
) -> Result<SystemTotal, PipelineError> {
    let mut dc_watts = vec![0.0f64; weather.len()];
    let mut ac_watts = vec![0.0f64; weather.len()];
    let mut degraded = 0usize;

    for (index, segment) in segments.iter().enumerate() {
        let result = match model.run(segment, weather) {
            Ok(result) => result,
            Err(err) => {
                warn!(
                    segment = %segment,
                    error = %err,
                    "segment model failed, contributing zero power"
                );
                degraded += 1;
                SegmentResult::zero(weather)
            }
        };

        if !result.aligns_with(weather) {
            return Err(PipelineError::Alignment(format!(
                "segment {index} ({segment}) returned {} samples against a weather index of {}",
                result.len(),
                weather.len()
            )));
        }

        for (i, sample) in result.samples().iter().enumerate() {
            dc_watts[i] += sample.dc_watts;
            ac_watts[i] += sample.ac_watts;
        }
    }

    info!(
        segments = segments.len(),
        degraded,
        samples = weather.len(),
        "system totals aggregated"
    );

    Ok(SystemTotal::new(
        weather.timestamps().collect(),
        dc_watts,
        ac_watts,
    ))
}
