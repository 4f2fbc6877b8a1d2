//! Trailing calendar-window moving average.
//!
//! MA(D, N) = mean(P[t] for trading dates t in (D - N days, D])
//! The window is measured in calendar days, not bars. A window reaching back
//! before the first trading date averages whatever prefix exists.

use crate::ports::price_port::PriceLookup;
use chrono::{Days, NaiveDate};

/// Mean price over the `period` calendar days ending on `last_day`.
///
/// Returns `None` when the window holds no prices, which is always the case
/// for `period == 0`.
pub fn moving_average(prices: &dyn PriceLookup, last_day: NaiveDate, period: u32) -> Option<f64> {
    if period == 0 {
        return None;
    }
    // (D - N, D] == [D - N + 1, D]
    let first_day = last_day
        .checked_sub_days(Days::new(u64::from(period) - 1))
        .unwrap_or(NaiveDate::MIN);
    let window = prices.prices_in_range(first_day, last_day);
    if window.is_empty() {
        return None;
    }
    let sum: f64 = window.iter().map(|p| p.price).sum();
    Some(sum / window.len() as f64)
}
