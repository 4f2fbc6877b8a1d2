//! Periodic-contribution simulation driver.
//!
//! Walks nominal contribution dates from the start date to the horizon,
//! resolves each to a trading date, sizes the contribution from the
//! moving-average deviation, and reports the holding period return of the
//! accumulated position.
//!
//! The position is valued one contribution period past the first trading date
//! beyond the horizon: the valuation window ends at
//! `period.advance(first trading date after end_date)`. This trailing window
//! is kept for parity with existing results.

use crate::domain::calendar::next_trade_day;
use crate::domain::error::AipError;
use crate::domain::moving_average::moving_average;
use crate::domain::period::{add_years, InvestPeriod};
use crate::domain::rate::{adjust_rate, RateBounds, RateFunction};
use crate::ports::price_port::PriceLookup;
use chrono::NaiveDate;
use tracing::{debug, info};

/// Nominal amount invested per period before the rate multiplier.
pub const DEFAULT_UNIT_AMOUNT: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub start_date: NaiveDate,
    pub inv_period: InvestPeriod,
    /// Horizon in whole calendar years.
    pub time_length: u32,
    /// Moving-average lookback in calendar days.
    pub ma_period: u32,
    pub function: RateFunction,
    pub bounds: RateBounds,
    pub unit_amount: f64,
}

impl SimulationConfig {
    pub fn end_date(&self) -> Result<NaiveDate, AipError> {
        add_years(self.start_date, self.time_length)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContributionEvent {
    pub date: NaiveDate,
    pub price: f64,
    pub moving_average: f64,
    pub multiplier: f64,
    pub money: f64,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub events: Vec<ContributionEvent>,
    pub end_date: NaiveDate,
    /// Last day of the valuation window.
    pub window_end: NaiveDate,
    pub final_date: NaiveDate,
    pub final_price: f64,
    pub total_money: f64,
    pub total_quantity: f64,
    pub total_return: f64,
}

impl SimulationResult {
    pub fn final_value(&self) -> f64 {
        self.total_quantity * self.final_price
    }
}

/// Runs the simulation over `time_length` years from the start date.
pub fn run_simulation(
    prices: &dyn PriceLookup,
    config: &SimulationConfig,
) -> Result<SimulationResult, AipError> {
    let end_date = config.end_date()?;
    run_simulation_until(prices, config, end_date)
}

/// Runs the simulation with an explicit horizon end date.
pub fn run_simulation_until(
    prices: &dyn PriceLookup,
    config: &SimulationConfig,
    end_date: NaiveDate,
) -> Result<SimulationResult, AipError> {
    info!(
        start = %config.start_date,
        end = %end_date,
        period = %config.inv_period,
        function = %config.function,
        "starting simulation"
    );

    let mut events: Vec<ContributionEvent> = Vec::new();
    let mut nominal_date = config.start_date;
    let mut trade_date = next_trade_day(prices, nominal_date)?;

    while trade_date <= end_date {
        // Consecutive nominal dates that resolve to the same trading date
        // (weekends under a daily period) buy once.
        if events.last().is_some_and(|e| e.date == trade_date) {
            debug!(date = %trade_date, nominal = %nominal_date, "already contributed");
            nominal_date = config.inv_period.advance(nominal_date)?;
            trade_date = next_trade_day(prices, nominal_date)?;
            continue;
        }

        let price = price_on(prices, trade_date)?;
        let ma_price = moving_average(prices, trade_date, config.ma_period).ok_or(
            AipError::UndefinedMean {
                date: trade_date,
                window: config.ma_period,
            },
        )?;
        let multiplier = adjust_rate(price, ma_price, config.function, config.bounds)?;
        let money = config.unit_amount * multiplier;

        debug!(date = %trade_date, price, ma_price, multiplier, money, "contribution");
        events.push(ContributionEvent {
            date: trade_date,
            price,
            moving_average: ma_price,
            multiplier,
            money,
            quantity: money / price,
        });

        nominal_date = config.inv_period.advance(nominal_date)?;
        trade_date = next_trade_day(prices, nominal_date)?;
    }

    let window_end = config.inv_period.advance(trade_date)?;
    let selected = events
        .iter()
        .filter(|e| e.date >= config.start_date && e.date <= window_end);

    let (total_money, total_quantity) = selected.fold((0.0, 0.0), |(money, quantity), e| {
        (money + e.money, quantity + e.quantity)
    });
    if total_money.is_nan() || total_money <= 0.0 {
        return Err(AipError::DivisionByZero {
            events: events.len(),
        });
    }

    let last = prices
        .prices_in_range(config.start_date, window_end)
        .last()
        .copied()
        .ok_or_else(|| AipError::Data {
            reason: format!("no prices between {} and {window_end}", config.start_date),
        })?;

    let total_return = total_quantity * last.price / total_money - 1.0;
    info!(
        contributions = events.len(),
        total_money,
        final_date = %last.date,
        total_return,
        "simulation finished"
    );

    Ok(SimulationResult {
        events,
        end_date,
        window_end,
        final_date: last.date,
        final_price: last.price,
        total_money,
        total_quantity,
        total_return,
    })
}

fn price_on(prices: &dyn PriceLookup, date: NaiveDate) -> Result<f64, AipError> {
    prices.price_at(date).ok_or_else(|| AipError::Data {
        reason: format!("no price recorded for trading date {date}"),
    })
}
