//! Data access port trait.

use crate::domain::error::AipError;
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;
use std::path::Path;

pub trait DataPort {
    fn load_series(&self, path: &Path, price_column: &str) -> Result<PriceSeries, AipError>;

    fn get_data_range(
        &self,
        path: &Path,
        price_column: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, AipError> {
        let series = self.load_series(path, price_column)?;
        Ok(match (series.first_date(), series.last_date()) {
            (Some(first), Some(last)) => Some((first, last, series.len())),
            _ => None,
        })
    }
}
