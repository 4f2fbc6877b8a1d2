//! Configuration validation.
//!
//! Validates all config fields before a simulation runs.

use crate::domain::error::AipError;
use crate::domain::period::InvestPeriod;
use crate::domain::rate::RateFunction;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::str::FromStr;

pub const SIMULATION: &str = "simulation";
pub const DATA: &str = "data";

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), AipError> {
    validate_start_date(config)?;
    validate_inv_period(config)?;
    validate_time_length(config)?;
    validate_ma_period(config)?;
    validate_function(config)?;
    validate_rates(config)?;
    validate_unit_amount(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), AipError> {
    match config.get_string(DATA, "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(AipError::ConfigMissing {
            section: DATA.to_string(),
            key: "path".to_string(),
        }),
    }
}

/// Parses `[section] key` when present; `Ok(None)` when absent.
pub fn parse_optional<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    expected: &str,
) -> Result<Option<T>, AipError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| invalid(section, key, format!("'{}' is not {expected}", raw.trim()))),
    }
}

pub fn parse_date(value: Option<&str>, section: &str, field: &str) -> Result<NaiveDate, AipError> {
    match value {
        None => Err(AipError::ConfigMissing {
            section: section.to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            invalid(
                section,
                field,
                format!("invalid {field} format, expected YYYY-MM-DD"),
            )
        }),
    }
}

fn invalid(section: &str, key: &str, reason: String) -> AipError {
    AipError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
}

fn validate_start_date(config: &dyn ConfigPort) -> Result<(), AipError> {
    let value = config.get_string(SIMULATION, "start_date");
    parse_date(value.as_deref(), SIMULATION, "start_date").map(|_| ())
}

fn validate_inv_period(config: &dyn ConfigPort) -> Result<(), AipError> {
    if let Some(raw) = config.get_string(SIMULATION, "inv_period") {
        raw.parse::<InvestPeriod>()
            .map_err(|e| invalid(SIMULATION, "inv_period", e.to_string()))?;
    }
    Ok(())
}

fn validate_time_length(config: &dyn ConfigPort) -> Result<(), AipError> {
    let years: Option<u32> =
        parse_optional(config, SIMULATION, "time_length", "a whole number of years")?;
    if years == Some(0) {
        return Err(invalid(
            SIMULATION,
            "time_length",
            "time_length must be at least 1 year".to_string(),
        ));
    }
    Ok(())
}

fn validate_ma_period(config: &dyn ConfigPort) -> Result<(), AipError> {
    parse_optional::<u32>(
        config,
        SIMULATION,
        "ma_period",
        "a non-negative number of days",
    )
    .map(|_| ())
}

fn validate_function(config: &dyn ConfigPort) -> Result<(), AipError> {
    if let Some(raw) = config.get_string(SIMULATION, "function") {
        raw.parse::<RateFunction>()
            .map_err(|e| invalid(SIMULATION, "function", e.to_string()))?;
    }
    Ok(())
}

fn validate_rates(config: &dyn ConfigPort) -> Result<(), AipError> {
    let min_rate: Option<f64> = parse_optional(config, SIMULATION, "min_rate", "a number")?;
    let max_rate: Option<f64> = parse_optional(config, SIMULATION, "max_rate", "a number")?;
    for (key, value) in [("min_rate", min_rate), ("max_rate", max_rate)] {
        if value.is_some_and(|v| !v.is_finite()) {
            return Err(invalid(SIMULATION, key, format!("{key} must be finite")));
        }
    }
    if let (Some(lo), Some(hi)) = (min_rate, max_rate) {
        if lo > hi {
            return Err(invalid(
                SIMULATION,
                "min_rate",
                "min_rate must not exceed max_rate".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_unit_amount(config: &dyn ConfigPort) -> Result<(), AipError> {
    let amount: Option<f64> = parse_optional(config, SIMULATION, "unit_amount", "a number")?;
    if amount.is_some_and(|a| !(a.is_finite() && a > 0.0)) {
        return Err(invalid(
            SIMULATION,
            "unit_amount",
            "unit_amount must be positive".to_string(),
        ));
    }
    Ok(())
}
