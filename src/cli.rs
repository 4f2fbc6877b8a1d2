//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::{CsvAdapter, DEFAULT_PRICE_COLUMN};
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    parse_date, validate_data_config, validate_simulation_config, DATA, SIMULATION,
};
use crate::domain::error::AipError;
use crate::domain::period::InvestPeriod;
use crate::domain::price_series::PriceSeries;
use crate::domain::rate::{RateBounds, RateFunction};
use crate::domain::simulation::{
    run_simulation, SimulationConfig, SimulationResult, DEFAULT_UNIT_AMOUNT,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "aipsim", about = "Automatic investment plan simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a simulation and print its return
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Price CSV, overrides [data] path
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Rate function, overrides [simulation] function
        #[arg(short, long)]
        function: Option<String>,
        /// Write the contribution ledger to this CSV file
        #[arg(short, long)]
        events: Option<PathBuf>,
    },
    /// Run the same plan once per rate function
    Compare {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the date range of a price file
    Info {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(long, default_value = DEFAULT_PRICE_COLUMN)]
        price_column: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            data,
            function,
            events,
        } => run_plan(&config, data.as_ref(), function.as_deref(), events.as_ref()),
        Command::Compare { config, data } => run_compare(&config, data.as_ref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { data, price_column } => run_info(&data, &price_column),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = AipError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_simulation_config(adapter: &dyn ConfigPort) -> Result<SimulationConfig, AipError> {
    let start_str = adapter.get_string(SIMULATION, "start_date");
    let start_date = parse_date(start_str.as_deref(), SIMULATION, "start_date")?;

    let inv_period = match adapter.get_string(SIMULATION, "inv_period") {
        Some(raw) => raw.parse::<InvestPeriod>()?,
        None => InvestPeriod::Monthly,
    };
    let function = match adapter.get_string(SIMULATION, "function") {
        Some(raw) => raw.parse::<RateFunction>()?,
        None => RateFunction::Linear,
    };

    let time_length = to_u32(adapter.get_int(SIMULATION, "time_length", 3), "time_length")?;
    let ma_period = to_u32(adapter.get_int(SIMULATION, "ma_period", 100), "ma_period")?;
    let defaults = RateBounds::default();

    Ok(SimulationConfig {
        start_date,
        inv_period,
        time_length,
        ma_period,
        function,
        bounds: RateBounds {
            min_rate: adapter.get_double(SIMULATION, "min_rate", defaults.min_rate),
            max_rate: adapter.get_double(SIMULATION, "max_rate", defaults.max_rate),
        },
        unit_amount: adapter.get_double(SIMULATION, "unit_amount", DEFAULT_UNIT_AMOUNT),
    })
}

fn to_u32(value: i64, key: &str) -> Result<u32, AipError> {
    u32::try_from(value).map_err(|_| AipError::ConfigInvalid {
        section: SIMULATION.into(),
        key: key.into(),
        reason: format!("{value} is out of range"),
    })
}

/// `--data` wins over `[data] path`.
pub fn resolve_data_path(data_override: Option<&PathBuf>, config: &dyn ConfigPort) -> Option<PathBuf> {
    if let Some(p) = data_override {
        return Some(p.clone());
    }
    config
        .get_string(DATA, "path")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

pub fn resolve_price_column(config: &dyn ConfigPort) -> String {
    config
        .get_string(DATA, "price_column")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_PRICE_COLUMN.to_string())
}

/// Validates config, builds the typed plan and loads its price series.
pub fn prepare(
    adapter: &dyn ConfigPort,
    data_port: &dyn DataPort,
    data_override: Option<&PathBuf>,
) -> Result<(SimulationConfig, PriceSeries), AipError> {
    validate_simulation_config(adapter)?;
    let sim_config = build_simulation_config(adapter)?;

    let data_path = match data_override {
        Some(path) => path.clone(),
        None => {
            validate_data_config(adapter)?;
            resolve_data_path(None, adapter).ok_or_else(|| AipError::ConfigMissing {
                section: DATA.into(),
                key: "path".into(),
            })?
        }
    };
    let price_column = resolve_price_column(adapter);

    info!(path = %data_path.display(), column = %price_column, "loading prices");
    let series = data_port.load_series(&data_path, &price_column)?;
    info!(rows = series.len(), "prices loaded");
    Ok((sim_config, series))
}

fn run_plan(
    config_path: &Path,
    data_override: Option<&PathBuf>,
    function_override: Option<&str>,
    events_path: Option<&PathBuf>,
) -> ExitCode {
    info!(path = %config_path.display(), "loading config");
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let (mut sim_config, series) = match prepare(&adapter, &CsvAdapter::new(), data_override) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if let Some(raw) = function_override {
        match raw.parse::<RateFunction>() {
            Ok(f) => sim_config.function = f,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    let result = match run_simulation(&series, &sim_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print_summary(&sim_config, &result);

    if let Some(path) = events_path {
        if let Err(e) = CsvReportAdapter.write(&result, &sim_config, path) {
            eprintln!("error: failed to write events: {e}");
            return (&e).into();
        }
        eprintln!("\nEvents written to: {}", path.display());
    }

    println!("{:.6}", result.total_return);
    ExitCode::SUCCESS
}

pub fn print_summary(config: &SimulationConfig, result: &SimulationResult) {
    eprintln!("\n=== Plan ===");
    eprintln!(
        "Period:           {} to {} ({} years)",
        config.start_date, result.end_date, config.time_length
    );
    eprintln!("Contribution:     {} x {:.2}", config.inv_period, config.unit_amount);
    eprintln!(
        "Rate function:    {} [{:.2}, {:.2}], MA {} days",
        config.function, config.bounds.min_rate, config.bounds.max_rate, config.ma_period
    );

    eprintln!("\n=== Results ===");
    if let (Some(first), Some(last)) = (result.events.first(), result.events.last()) {
        eprintln!("Contributions:    {} ({} to {})", result.events.len(), first.date, last.date);
    }
    eprintln!("Total Invested:   {:.2}", result.total_money);
    eprintln!(
        "Final Value:      {:.2} ({} @ {:.2})",
        result.final_value(),
        result.final_date,
        result.final_price
    );
    eprintln!("Total Return:     {:.2}%", result.total_return * 100.0);
}

/// One outcome per rate function; a failing function does not stop the rest.
pub fn compare_functions(
    series: &PriceSeries,
    config: &SimulationConfig,
) -> Vec<(RateFunction, Result<SimulationResult, AipError>)> {
    RateFunction::ALL
        .into_iter()
        .map(|function| {
            let cfg = SimulationConfig {
                function,
                ..config.clone()
            };
            (function, run_simulation(series, &cfg))
        })
        .collect()
}

fn run_compare(config_path: &Path, data_override: Option<&PathBuf>) -> ExitCode {
    info!(path = %config_path.display(), "loading config");
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let (sim_config, series) = match prepare(&adapter, &CsvAdapter::new(), data_override) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Comparing rate functions: {} from {}, {} years, MA {} days",
        sim_config.inv_period, sim_config.start_date, sim_config.time_length, sim_config.ma_period
    );

    let mut failures = 0usize;
    for (function, outcome) in compare_functions(&series, &sim_config) {
        match outcome {
            Ok(r) => println!(
                "{:<8} {:>+9.2}%  invested {:>12.2}  value {:>12.2}",
                function.name(),
                r.total_return * 100.0,
                r.total_money,
                r.final_value()
            ),
            Err(e) => {
                failures += 1;
                println!("{:<8} error: {}", function.name(), e);
            }
        }
    }

    if failures == RateFunction::ALL.len() {
        ExitCode::from(4)
    } else {
        ExitCode::SUCCESS
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let sim_config = match validate_simulation_config(&adapter)
        .and_then(|()| build_simulation_config(&adapter))
    {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let end = match sim_config.end_date() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nPlan:");
    eprintln!("  start_date:  {}", sim_config.start_date);
    eprintln!("  end_date:    {}", end);
    eprintln!("  inv_period:  {}", sim_config.inv_period);
    eprintln!("  ma_period:   {}", sim_config.ma_period);
    eprintln!("  function:    {}", sim_config.function);
    eprintln!(
        "  rate bounds: [{}, {}]",
        sim_config.bounds.min_rate, sim_config.bounds.max_rate
    );

    match resolve_data_path(None, &adapter) {
        Some(p) => eprintln!("  data:        {} ({})", p.display(), resolve_price_column(&adapter)),
        None => eprintln!("  data:        <none, pass --data>"),
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_info(data_path: &Path, price_column: &str) -> ExitCode {
    match CsvAdapter::new().get_data_range(data_path, price_column) {
        Ok(Some((first, last, count))) => {
            println!("{}: {} rows, {} to {}", data_path.display(), count, first, last);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no data found", data_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
