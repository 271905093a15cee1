//! Current-magnitude histogram (duty-cycle distribution).

use serde::Serialize;

use crate::domain::CurrentSeries;
use crate::error::PipelineError;

/// One current-magnitude bin.
///
/// `upper_amps` is `None` for the final bin, which is unbounded above so no
/// sample can fall outside the histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub lower_amps: f64,
    pub upper_amps: Option<f64>,
    pub count: usize,
}

/// Classify every sample into `bin_count` contiguous closed-open bins of
/// width `bin_width_amps` starting at zero, returned in ascending order of
/// lower bound.
///
/// A sample exactly on a boundary belongs to the upper bin. The final bin
/// absorbs every sample at or beyond its lower edge, so the counts always
/// sum to the series length.
pub fn bin(
    current: &CurrentSeries,
    bin_width_amps: f64,
    bin_count: usize,
) -> Result<Vec<Bin>, PipelineError> {
    if !bin_width_amps.is_finite() || bin_width_amps <= 0.0 {
        return Err(PipelineError::Configuration(format!(
            "bin width must be > 0 A, got {bin_width_amps}"
        )));
    }
    if bin_count == 0 {
        return Err(PipelineError::Configuration(
            "bin count must be at least 1".to_string(),
        ));
    }

    // Interior edges only; the outermost bounds are -inf/+inf as far as
    // classification is concerned. Classification and the cumulative
    // threshold formulation (see the tests) compare against these exact
    // edge values, so the two always agree.
    let edges: Vec<f64> = (1..bin_count).map(|i| i as f64 * bin_width_amps).collect();

    let mut counts = vec![0usize; bin_count];
    for &amps in current.amps() {
        counts[classify(amps, &edges)] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            lower_amps: i as f64 * bin_width_amps,
            upper_amps: edges.get(i).copied(),
            count,
        })
        .collect())
}

/// Monotonic closed-open classification: the index of the bin whose
/// [lower, upper) interval holds `amps`. Samples on an edge go up; samples
/// below zero (anomalies by the converter's contract) land in the first bin.
fn classify(amps: f64, interior_edges: &[f64]) -> usize {
    interior_edges.partition_point(|&edge| edge <= amps)
}
