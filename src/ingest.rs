//! Historical weather CSV ingestion.
//!
//! The upstream export carries ten columns in fixed order: timestamp,
//! coordinates, model, elevation, utc_offset, temperature, wind_speed, ghi,
//! dhi, dni. Header spellings vary between exports, so fields are read by
//! position.

use std::fs::File;
use std::io;
use std::path::Path;

use chrono::{Duration, FixedOffset, NaiveDateTime, TimeZone};
use csv::StringRecord;
use tracing::info;

use crate::domain::{WeatherSample, WeatherSeries};
use crate::error::PipelineError;

pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const COL_TIMESTAMP: usize = 0;
const COL_UTC_OFFSET: usize = 4;
const COL_TEMPERATURE: usize = 5;
const COL_WIND_SPEED: usize = 6;
const COL_GHI: usize = 7;
const COL_DHI: usize = 8;
const COL_DNI: usize = 9;

/// The slice of the record a run wants: a half-open [start, end) local-time
/// range and the sampling interval the file is expected to honor.
#[derive(Debug, Clone)]
pub struct WeatherRequest {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub sample_interval: Duration,
}

/// Load and filter a weather CSV file into a validated [`WeatherSeries`].
pub fn load_csv(path: &Path, request: &WeatherRequest) -> Result<WeatherSeries, PipelineError> {
    let file = File::open(path).map_err(|e| {
        PipelineError::DataQuality(format!("cannot open weather file {}: {e}", path.display()))
    })?;
    let series = read_csv(file, request)?;
    info!(
        path = %path.display(),
        samples = series.len(),
        "weather record loaded"
    );
    Ok(series)
}

/// Parse weather samples from any CSV reader and keep those inside the
/// requested range.
///
/// Timestamps are naive wall-clock values localized by the file's own
/// utc_offset column; the requested range uses the same wall clock. Rows
/// with unparsable or non-finite numeric cells and files mixing UTC offsets
/// are data-quality errors.
pub fn read_csv<R: io::Read>(
    reader: R,
    request: &WeatherRequest,
) -> Result<WeatherSeries, PipelineError> {
    if request.end <= request.start {
        return Err(PipelineError::Configuration(format!(
            "empty weather range: start {} is not before end {}",
            request.start, request.end
        )));
    }

    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut shared_offset: Option<FixedOffset> = None;
    let mut samples = Vec::new();

    for (row, record) in csv_reader.records().enumerate() {
        let line = row + 2; // 1-based, after the header line
        let record = record
            .map_err(|e| PipelineError::DataQuality(format!("CSV parse error at line {line}: {e}")))?;

        if record.len() <= COL_DNI {
            return Err(PipelineError::DataQuality(format!(
                "line {line} has {} columns, expected at least {}",
                record.len(),
                COL_DNI + 1
            )));
        }

        let naive = NaiveDateTime::parse_from_str(&record[COL_TIMESTAMP], TIMESTAMP_FORMAT)
            .map_err(|e| {
                PipelineError::DataQuality(format!(
                    "bad timestamp {:?} at line {line}: {e}",
                    &record[COL_TIMESTAMP]
                ))
            })?;

        let offset = parse_utc_offset(&record, line)?;
        match shared_offset {
            None => shared_offset = Some(offset),
            Some(existing) if existing != offset => {
                return Err(PipelineError::DataQuality(format!(
                    "mixed UTC offsets in one file: {existing} then {offset} at line {line}"
                )));
            }
            Some(_) => {}
        }

        // Half-open range on the file's own wall clock, inclusive start.
        if naive < request.start || naive >= request.end {
            continue;
        }

        let timestamp = offset
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| {
                PipelineError::DataQuality(format!("unrepresentable timestamp at line {line}"))
            })?;

        samples.push(WeatherSample {
            timestamp,
            temperature_c: parse_field(&record, COL_TEMPERATURE, "temperature", line)?,
            wind_speed_ms: parse_field(&record, COL_WIND_SPEED, "wind_speed", line)?,
            ghi_wm2: parse_field(&record, COL_GHI, "ghi", line)?,
            dhi_wm2: parse_field(&record, COL_DHI, "dhi", line)?,
            dni_wm2: parse_field(&record, COL_DNI, "dni", line)?,
        });
    }

    if samples.is_empty() {
        return Err(PipelineError::DataQuality(format!(
            "no weather samples between {} and {}",
            request.start, request.end
        )));
    }

    WeatherSeries::new(samples, request.sample_interval)
}

fn parse_utc_offset(record: &StringRecord, line: usize) -> Result<FixedOffset, PipelineError> {
    let hours: f64 = record[COL_UTC_OFFSET].trim().parse().map_err(|_| {
        PipelineError::DataQuality(format!(
            "bad utc_offset {:?} at line {line}",
            &record[COL_UTC_OFFSET]
        ))
    })?;
    if !hours.is_finite() || hours.abs() > 14.0 {
        return Err(PipelineError::DataQuality(format!(
            "utc_offset {hours} out of range at line {line}"
        )));
    }
    FixedOffset::east_opt((hours * 3600.0) as i32).ok_or_else(|| {
        PipelineError::DataQuality(format!("utc_offset {hours} out of range at line {line}"))
    })
}

fn parse_field(
    record: &StringRecord,
    column: usize,
    name: &str,
    line: usize,
) -> Result<f64, PipelineError> {
    let raw = record[column].trim();
    let value: f64 = raw.parse().map_err(|_| {
        PipelineError::DataQuality(format!("bad {name} value {raw:?} at line {line}"))
    })?;
    if !value.is_finite() {
        return Err(PipelineError::DataQuality(format!(
            "non-finite {name} value at line {line}"
        )));
    }
    Ok(value)
}
