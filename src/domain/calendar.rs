//! Trading-day resolution.

use crate::domain::error::AipError;
use crate::ports::price_port::PriceLookup;
use chrono::NaiveDate;

/// First trading date on or after `date`.
///
/// Fails with [`AipError::DateNotFound`] once `date` is past the end of the
/// series.
pub fn next_trade_day(prices: &dyn PriceLookup, date: NaiveDate) -> Result<NaiveDate, AipError> {
    prices
        .first_trading_date_on_or_after(date)
        .ok_or_else(|| AipError::DateNotFound {
            date,
            last: prices
                .last_trading_date()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "<empty>".to_string()),
        })
}
