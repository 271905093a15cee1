use anyhow::{Context, Result};
use pv_duty::{config, ingest, model, pipeline, report, telemetry};
use config::Config;
use model::ArrayPowerModel;
use telemetry::init_tracing;
use tracing::info;

fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load().context("loading configuration")?;
    cfg.validate()?;

    let request = cfg.weather.request()?;
    let weather = ingest::load_csv(&cfg.weather.csv_path, &request)?;

    let power_model = ArrayPowerModel::new(
        cfg.site,
        cfg.module,
        cfg.cell_temperature,
        cfg.inverter,
    );

    info!(segments = cfg.segments.len(), "modeling installation");
    let total = pipeline::aggregate(&cfg.segments, &weather, &power_model)?;
    let current = pipeline::to_current(&total, cfg.electrical.nominal_voltage_v)?;
    let bins = pipeline::bin(
        &current,
        cfg.histogram.bin_width_amps,
        cfg.histogram.bin_count,
    )?;

    print!(
        "{}",
        report::render(&total, &current, &bins, weather.sample_interval())
    );

    if let Some(path) = &cfg.report.json_path {
        let json = report::to_json(&total, &current, &bins)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing JSON report to {}", path.display()))?;
        info!(path = %path.display(), "JSON report written");
    }

    Ok(())
}
