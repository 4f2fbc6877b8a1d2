//! Contribution-rate adjustment.
//!
//! The deviation of price below its moving average, `percent = (M - P) / M`,
//! gives a base rate `1 + percent` clamped to `[min_rate, max_rate]`. The
//! selected [`RateFunction`] then shapes that base rate into the multiplier
//! applied to the nominal contribution.

use crate::domain::error::AipError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateFunction {
    Linear,
    Null,
    Log,
    Exp,
    Ali,
}

impl RateFunction {
    pub const ALL: [RateFunction; 5] = [
        RateFunction::Linear,
        RateFunction::Null,
        RateFunction::Log,
        RateFunction::Exp,
        RateFunction::Ali,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RateFunction::Linear => "linear",
            RateFunction::Null => "null",
            RateFunction::Log => "log",
            RateFunction::Exp => "exp",
            RateFunction::Ali => "ali",
        }
    }
}

impl FromStr for RateFunction {
    type Err = AipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RateFunction::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AipError::InvalidConfiguration {
                reason: format!(
                    "unknown rate function '{}' (expected linear, null, log, exp or ali)",
                    s.trim()
                ),
            })
    }
}

impl fmt::Display for RateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateBounds {
    pub min_rate: f64,
    pub max_rate: f64,
}

impl Default for RateBounds {
    fn default() -> Self {
        Self {
            min_rate: 0.5,
            max_rate: 1.5,
        }
    }
}

/// `1 + percent` clamped into the bounds.
///
/// Not `f64::clamp`: inverted bounds resolve to `max_rate` instead of
/// panicking.
pub fn base_rate(price: f64, ma_price: f64, bounds: RateBounds) -> f64 {
    let x = 1.0 + deviation(price, ma_price);
    x.max(bounds.min_rate).min(bounds.max_rate)
}

/// Contribution multiplier for `price` against its moving average.
pub fn adjust_rate(
    price: f64,
    ma_price: f64,
    function: RateFunction,
    bounds: RateBounds,
) -> Result<f64, AipError> {
    let rate = base_rate(price, ma_price, bounds);
    let multiplier = match function {
        RateFunction::Linear => rate,
        RateFunction::Null => 1.0,
        RateFunction::Log => {
            if rate <= 0.0 {
                return Err(AipError::MathDomain { base_rate: rate });
            }
            (rate.ln() + 1.0).max(0.0)
        }
        RateFunction::Exp => (rate - 1.0).exp(),
        RateFunction::Ali => ali_tier(-deviation(price, ma_price)),
    };
    Ok(multiplier)
}

fn deviation(price: f64, ma_price: f64) -> f64 {
    (ma_price - price) / ma_price
}

/// Five-step schedule keyed on how far price sits above its average.
pub fn ali_tier(ali_percent: f64) -> f64 {
    if ali_percent > 1.0 {
        0.6
    } else if ali_percent >= 0.5 {
        0.7
    } else if ali_percent >= 0.15 {
        0.8
    } else if ali_percent > 0.0 {
        0.9
    } else {
        1.0
    }
}
