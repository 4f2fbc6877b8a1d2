//! CSV file data adapter.
//!
//! Reads daily quote files in the common `Date,Open,High,Low,Close,Adj Close,Volume`
//! layout. The first column is the date; the price column is picked by header
//! name.

use crate::domain::error::AipError;
use crate::domain::price_series::{PricePoint, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub const DEFAULT_PRICE_COLUMN: &str = "Adj Close";

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvAdapter;

impl CsvAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Parses CSV text into a series.
    pub fn parse(content: &str, price_column: &str) -> Result<PriceSeries, AipError> {
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| AipError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let price_idx = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(price_column.trim()))
            .ok_or_else(|| AipError::Data {
                reason: format!("missing '{}' column", price_column),
            })?;

        let mut points = Vec::new();
        let mut skipped = 0usize;

        for result in rdr.records() {
            let record = result.map_err(|e| AipError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| AipError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                AipError::Data {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            let raw = record.get(price_idx).unwrap_or("").trim();
            if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
                warn!(%date, column = price_column, "skipping row without a price");
                skipped += 1;
                continue;
            }
            let price: f64 = raw.parse().map_err(|e| AipError::Data {
                reason: format!("invalid {} value on {}: {}", price_column, date, e),
            })?;

            points.push(PricePoint { date, price });
        }

        points.sort_by_key(|p| p.date);
        debug!(rows = points.len(), skipped, "parsed price series");
        PriceSeries::new(points)
    }
}

impl DataPort for CsvAdapter {
    fn load_series(&self, path: &Path, price_column: &str) -> Result<PriceSeries, AipError> {
        let content = fs::read_to_string(path).map_err(|e| AipError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::parse(&content, price_column)
    }
}
