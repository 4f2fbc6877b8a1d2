//! Contribution ledger written as CSV.
//!
//! The first line is a `#` comment carrying the plan that produced the
//! ledger; read it back with `csv::ReaderBuilder::comment(Some(b'#'))`.

use crate::domain::error::AipError;
use crate::domain::simulation::{SimulationConfig, SimulationResult};
use crate::ports::report_port::ReportPort;
use std::io::Write;
use std::path::Path;

const HEADER: [&str; 6] = [
    "date",
    "price",
    "moving_average",
    "multiplier",
    "money",
    "quantity",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    /// Writes the plan comment, then one row per contribution event.
    pub fn write_events<W: Write>(
        result: &SimulationResult,
        config: &SimulationConfig,
        mut out: W,
    ) -> Result<(), AipError> {
        writeln!(out, "{}", plan_comment(config))?;
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(HEADER).map_err(csv_error)?;
        for e in &result.events {
            wtr.write_record([
                e.date.to_string(),
                format!("{:.6}", e.price),
                format!("{:.6}", e.moving_average),
                format!("{:.6}", e.multiplier),
                format!("{:.2}", e.money),
                format!("{:.8}", e.quantity),
            ])
            .map_err(csv_error)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        result: &SimulationResult,
        config: &SimulationConfig,
        output_path: &Path,
    ) -> Result<(), AipError> {
        let file = std::fs::File::create(output_path)?;
        tracing::info!(
            path = %output_path.display(),
            events = result.events.len(),
            function = %config.function,
            "writing contribution ledger"
        );
        Self::write_events(result, config, file)
    }
}

fn plan_comment(config: &SimulationConfig) -> String {
    format!(
        "# start_date={} inv_period={} time_length={} ma_period={} function={} min_rate={} max_rate={} unit_amount={}",
        config.start_date,
        config.inv_period,
        config.time_length,
        config.ma_period,
        config.function,
        config.bounds.min_rate,
        config.bounds.max_rate,
        config.unit_amount,
    )
}

fn csv_error(e: csv::Error) -> AipError {
    AipError::Data {
        reason: format!("CSV write error: {}", e),
    }
}
