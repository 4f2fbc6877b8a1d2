//! Daily price series keyed by trading date.

use crate::domain::error::AipError;
use crate::ports::price_port::PriceLookup;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Immutable, strictly date-ordered series of adjusted close prices.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series, rejecting out-of-order or duplicate dates and
    /// non-finite or non-positive prices.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, AipError> {
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(AipError::Data {
                    reason: format!(
                        "dates must be strictly increasing: {} follows {}",
                        pair[1].date, pair[0].date
                    ),
                });
            }
        }
        if let Some(bad) = points
            .iter()
            .find(|p| !p.price.is_finite() || p.price <= 0.0)
        {
            return Err(AipError::Data {
                reason: format!("invalid price {} on {}", bad.price, bad.date),
            });
        }
        Ok(Self { points })
    }

    pub fn from_pairs<I>(pairs: I) -> Result<Self, AipError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(date, price)| PricePoint { date, price })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    fn lower_bound(&self, date: NaiveDate) -> usize {
        self.points.partition_point(|p| p.date < date)
    }
}

impl PriceLookup for PriceSeries {
    fn price_at(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].price)
    }

    fn first_trading_date_on_or_after(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.points.get(self.lower_bound(date)).map(|p| p.date)
    }

    fn prices_in_range(&self, start: NaiveDate, end: NaiveDate) -> &[PricePoint] {
        if start > end {
            return &[];
        }
        let lo = self.lower_bound(start);
        let hi = self.points.partition_point(|p| p.date <= end);
        &self.points[lo..hi]
    }

    fn last_trading_date(&self) -> Option<NaiveDate> {
        self.last_date()
    }
}
