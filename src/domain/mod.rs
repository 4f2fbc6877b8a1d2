//! Core domain types and simulation logic.

pub mod price_series;
pub mod period;
pub mod calendar;
pub mod moving_average;
pub mod rate;
pub mod simulation;
pub mod config_validation;
pub mod error;
