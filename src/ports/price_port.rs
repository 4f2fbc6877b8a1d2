//! Time-indexed price lookup port.
//!
//! The simulation engine only ever reads prices through this trait, so any
//! ordered, read-only store of (date, price) pairs can back a run.

use crate::domain::price_series::PricePoint;
use chrono::NaiveDate;

pub trait PriceLookup {
    /// Price on exactly `date`, if it is a trading date.
    fn price_at(&self, date: NaiveDate) -> Option<f64>;

    /// Closest trading date on or after `date`.
    fn first_trading_date_on_or_after(&self, date: NaiveDate) -> Option<NaiveDate>;

    /// Trading dates within `[start, end]`, ascending.
    fn prices_in_range(&self, start: NaiveDate, end: NaiveDate) -> &[PricePoint];

    fn last_trading_date(&self) -> Option<NaiveDate>;
}
