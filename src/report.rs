//! Run summary for the report sink.
//!
//! Renders the fully-computed series and histogram as plain text and,
//! optionally, as a JSON document. The inputs are owned, immutable values
//! the sink may read any number of times.

use std::fmt::Write as _;

use chrono::Duration;
use itertools::Itertools;
use serde::Serialize;

use crate::domain::{CurrentSeries, SystemTotal};
use crate::pipeline::Bin;

/// Plain-text run summary: system peaks, energy over the run, and the
/// duty-cycle table.
pub fn render(
    total: &SystemTotal,
    current: &CurrentSeries,
    bins: &[Bin],
    sample_interval: Duration,
) -> String {
    let interval_hours = sample_interval.num_seconds() as f64 / 3600.0;
    let mut out = String::new();

    writeln!(out, "PV system output summary").unwrap();
    writeln!(
        out,
        "  samples:       {} x {} min",
        total.len(),
        sample_interval.num_minutes()
    )
    .unwrap();

    if let Some(i) = peak_index(total.dc_watts()) {
        writeln!(
            out,
            "  peak DC power: {:.2} kW at {}",
            total.dc_watts()[i] / 1000.0,
            total.timestamps()[i]
        )
        .unwrap();
    }
    if let Some(i) = peak_index(total.ac_watts()) {
        writeln!(
            out,
            "  peak AC power: {:.2} kW at {}",
            total.ac_watts()[i] / 1000.0,
            total.timestamps()[i]
        )
        .unwrap();
    }
    if let Some(i) = peak_index(current.amps()) {
        writeln!(out, "  peak current:  {:.1} A", current.amps()[i]).unwrap();
    }

    let dc_energy_kwh: f64 =
        total.dc_watts().iter().sum::<f64>() * interval_hours / 1000.0;
    let ac_energy_kwh: f64 =
        total.ac_watts().iter().sum::<f64>() * interval_hours / 1000.0;
    writeln!(out, "  DC energy:     {dc_energy_kwh:.1} kWh").unwrap();
    writeln!(out, "  AC energy:     {ac_energy_kwh:.1} kWh").unwrap();

    writeln!(out).unwrap();
    writeln!(out, "Current duty-cycle distribution").unwrap();
    let sample_count = current.len().max(1);
    for bin in bins {
        let range = match bin.upper_amps {
            Some(upper) => format!("[{:6.1}, {:6.1}) A", bin.lower_amps, upper),
            None => format!("[{:6.1},   +inf) A", bin.lower_amps),
        };
        writeln!(
            out,
            "  {range}  {:>6} samples  {:>7.1} h  {:>5.1} %",
            bin.count,
            bin.count as f64 * interval_hours,
            bin.count as f64 / sample_count as f64 * 100.0
        )
        .unwrap();
    }

    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    total: &'a SystemTotal,
    current: &'a CurrentSeries,
    bins: &'a [Bin],
}

/// Machine-readable dump of the same values.
pub fn to_json(
    total: &SystemTotal,
    current: &CurrentSeries,
    bins: &[Bin],
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        total,
        current,
        bins,
    })
}

/// Index of the largest value over the whole series. The final sample is an
/// ordinary sample; it gets no special treatment.
fn peak_index(values: &[f64]) -> Option<usize> {
    values.iter().position_max_by(|a, b| a.total_cmp(b))
}
