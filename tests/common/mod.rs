#![allow(dead_code)]

use aipsim::domain::error::AipError;
use aipsim::domain::period::InvestPeriod;
pub use aipsim::domain::price_series::PriceSeries;
use aipsim::domain::rate::{RateBounds, RateFunction};
use aipsim::domain::simulation::{SimulationConfig, DEFAULT_UNIT_AMOUNT};
use aipsim::ports::data_port::DataPort;
use chrono::{Datelike, NaiveDate, Weekday};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Serves one in-memory series and records which paths were requested.
pub struct MockDataPort {
    pub series: PriceSeries,
    pub error: Option<String>,
    pub requests: RefCell<Vec<(PathBuf, String)>>,
}

impl MockDataPort {
    pub fn new(series: PriceSeries) -> Self {
        Self {
            series,
            error: None,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn load_series(&self, path: &Path, price_column: &str) -> Result<PriceSeries, AipError> {
        self.requests
            .borrow_mut()
            .push((path.to_path_buf(), price_column.to_string()));
        if let Some(reason) = &self.error {
            return Err(AipError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.series.clone())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One price per calendar day starting at `start`.
pub fn daily_series(start: NaiveDate, prices: &[f64]) -> PriceSeries {
    PriceSeries::from_pairs(
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| (start + chrono::Duration::days(i as i64), p)),
    )
    .unwrap()
}

/// Monday-to-Friday series from `start` to `end` inclusive, price from `f(i)`.
pub fn weekday_series(start: NaiveDate, end: NaiveDate, f: impl Fn(usize) -> f64) -> PriceSeries {
    let mut pairs = Vec::new();
    let mut day = start;
    while day <= end {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            pairs.push((day, f(pairs.len())));
        }
        day = day.succ_opt().unwrap();
    }
    PriceSeries::from_pairs(pairs).unwrap()
}

pub fn sample_config() -> SimulationConfig {
    SimulationConfig {
        start_date: date(2020, 1, 1),
        inv_period: InvestPeriod::Monthly,
        time_length: 1,
        ma_period: 30,
        function: RateFunction::Linear,
        bounds: RateBounds::default(),
        unit_amount: DEFAULT_UNIT_AMOUNT,
    }
}
