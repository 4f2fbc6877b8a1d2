//! Integration tests for the simulation engine.
//!
//! Tests cover:
//! - Flat-price plan returns exactly zero
//! - Calendar exhaustion surfaces DateNotFound
//! - Zero-day moving average surfaces an undefined mean
//! - Multi-year monthly plan on a weekday calendar, including the trailing
//!   valuation window
//! - Rate-function properties (proptest)

mod common;

use aipsim::domain::calendar::next_trade_day;
use aipsim::domain::error::AipError;
use aipsim::domain::moving_average::moving_average;
use aipsim::domain::period::InvestPeriod;
use aipsim::domain::rate::{adjust_rate, ali_tier, base_rate, RateBounds, RateFunction};
use aipsim::domain::simulation::{run_simulation, run_simulation_until, SimulationConfig};
use approx::assert_relative_eq;
use common::*;

mod scenarios {
    use super::*;

    #[test]
    fn flat_series_three_daily_contributions() {
        let series = daily_series(date(2024, 1, 1), &[100.0; 10]);
        let config = SimulationConfig {
            start_date: date(2024, 1, 1),
            inv_period: InvestPeriod::Days(1),
            ma_period: 5,
            function: RateFunction::Linear,
            bounds: RateBounds {
                min_rate: 0.5,
                max_rate: 1.5,
            },
            ..sample_config()
        };

        let result = run_simulation_until(&series, &config, date(2024, 1, 3)).unwrap();

        assert_eq!(result.events.len(), 3);
        assert!(result.events.iter().all(|e| e.multiplier == 1.0));
        assert!(result.events.iter().all(|e| e.money == 1000.0));
        assert_relative_eq!(result.final_price, 100.0);
        assert_relative_eq!(result.total_return, 0.0);
    }

    #[test]
    fn date_past_end_of_fifty_day_series() {
        let series = daily_series(date(2024, 1, 1), &[42.0; 50]);
        let last = series.last_date().unwrap();
        let err = next_trade_day(&series, last + chrono::Duration::days(100)).unwrap_err();
        assert!(matches!(err, AipError::DateNotFound { .. }));

        let config = SimulationConfig {
            start_date: last + chrono::Duration::days(100),
            ..sample_config()
        };
        assert!(matches!(
            run_simulation(&series, &config),
            Err(AipError::DateNotFound { .. })
        ));
    }

    #[test]
    fn horizon_longer_than_history() {
        let series = daily_series(date(2024, 1, 1), &[42.0; 50]);
        let config = SimulationConfig {
            start_date: date(2024, 1, 1),
            inv_period: InvestPeriod::Weekly,
            time_length: 1,
            ..sample_config()
        };
        let err = run_simulation(&series, &config).unwrap_err();
        assert!(matches!(err, AipError::DateNotFound { .. }));
    }

    #[test]
    fn zero_day_window_is_undefined_mean() {
        let series = daily_series(date(2024, 1, 1), &[100.0; 10]);
        assert_eq!(moving_average(&series, date(2024, 1, 5), 0), None);

        let config = SimulationConfig {
            start_date: date(2024, 1, 1),
            inv_period: InvestPeriod::Days(1),
            ma_period: 0,
            ..sample_config()
        };
        let err = run_simulation_until(&series, &config, date(2024, 1, 3)).unwrap_err();
        assert!(matches!(err, AipError::UndefinedMean { window: 0, .. }));
    }

    #[test]
    fn monthly_plan_over_one_year_of_weekdays() {
        // 2020-01-01 is a Wednesday; the horizon ends Friday 2021-01-01.
        let series = weekday_series(date(2020, 1, 1), date(2021, 3, 31), |i| {
            100.0 + i as f64 * 0.1
        });
        let config = SimulationConfig {
            function: RateFunction::Null,
            ..sample_config()
        };

        let result = run_simulation(&series, &config).unwrap();

        assert_eq!(result.end_date, date(2021, 1, 1));
        assert_eq!(result.events.len(), 13);
        assert_eq!(result.events[0].date, date(2020, 1, 1));
        // Sat 2020-02-01 -> Mon 2020-02-03, Sun 2020-03-01 -> Mon 2020-03-02
        assert_eq!(result.events[1].date, date(2020, 2, 3));
        assert_eq!(result.events[2].date, date(2020, 3, 2));
        assert_eq!(result.events[12].date, date(2021, 1, 1));

        // Loop stops at Mon 2021-02-01; valuation runs one more month.
        assert_eq!(result.window_end, date(2021, 3, 1));
        assert_eq!(result.final_date, date(2021, 3, 1));

        assert_relative_eq!(result.total_money, 13_000.0);
        assert!(result.total_return > 0.0);
    }

    #[test]
    fn totals_recompute_from_events() {
        let series = weekday_series(date(2019, 1, 1), date(2022, 6, 30), |i| {
            200.0 + 40.0 * (i as f64 / 17.0).sin()
        });
        for function in RateFunction::ALL {
            let config = SimulationConfig {
                start_date: date(2019, 3, 15),
                inv_period: InvestPeriod::Weekly,
                time_length: 2,
                ma_period: 60,
                function,
                ..sample_config()
            };
            let result = run_simulation(&series, &config).unwrap();

            let money: f64 = result.events.iter().map(|e| e.money).sum();
            let quantity: f64 = result.events.iter().map(|e| e.money / e.price).sum();
            assert_relative_eq!(result.total_money, money, max_relative = 1e-12);
            assert_relative_eq!(result.total_quantity, quantity, max_relative = 1e-12);
            assert_relative_eq!(
                result.total_return,
                quantity * result.final_price / money - 1.0,
                max_relative = 1e-9
            );
            if function == RateFunction::Null {
                assert!(result.events.iter().all(|e| e.multiplier == 1.0));
            }
        }
    }

    #[test]
    fn shared_series_is_left_untouched() {
        let series = weekday_series(date(2020, 1, 1), date(2021, 6, 30), |i| {
            50.0 + (i % 20) as f64
        });
        let before = series.points().to_vec();

        let linear = run_simulation(&series, &sample_config()).unwrap();
        let ali = run_simulation(
            &series,
            &SimulationConfig {
                function: RateFunction::Ali,
                ..sample_config()
            },
        )
        .unwrap();
        let linear_again = run_simulation(&series, &sample_config()).unwrap();

        assert_eq!(series.points(), before.as_slice());
        assert_eq!(linear, linear_again);
        assert_eq!(linear.events.len(), ali.events.len());
    }
}

mod rate_properties {
    use super::*;
    use proptest::prelude::*;

    fn bounds() -> impl Strategy<Value = RateBounds> {
        (0.0f64..2.0, 0.0f64..2.0).prop_map(|(a, b)| RateBounds {
            min_rate: a.min(b),
            max_rate: a.max(b),
        })
    }

    proptest! {
        #[test]
        fn null_is_always_one(price in 0.01f64..10_000.0, ma in 0.01f64..10_000.0, b in bounds()) {
            prop_assert_eq!(adjust_rate(price, ma, RateFunction::Null, b).unwrap(), 1.0);
        }

        #[test]
        fn linear_at_average_is_one(price in 0.01f64..10_000.0, lo in 0.0f64..1.0, hi in 1.0f64..3.0) {
            let b = RateBounds { min_rate: lo, max_rate: hi };
            prop_assert_eq!(adjust_rate(price, price, RateFunction::Linear, b).unwrap(), 1.0);
        }

        #[test]
        fn linear_stays_within_bounds(price in 0.01f64..10_000.0, ma in 0.01f64..10_000.0, b in bounds()) {
            let r = adjust_rate(price, ma, RateFunction::Linear, b).unwrap();
            prop_assert!(r >= b.min_rate && r <= b.max_rate);
        }

        #[test]
        fn ali_is_non_increasing(a in -3.0f64..3.0, b in -3.0f64..3.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(ali_tier(lo) >= ali_tier(hi));
        }

        #[test]
        fn raising_min_rate_never_lowers_rate(
            price in 0.01f64..10_000.0,
            ma in 0.01f64..10_000.0,
            lo in 0.0f64..2.0,
            bump in 0.0f64..1.0,
            hi in 0.0f64..3.0,
        ) {
            let before = base_rate(price, ma, RateBounds { min_rate: lo, max_rate: hi });
            let after = base_rate(price, ma, RateBounds { min_rate: lo + bump, max_rate: hi });
            prop_assert!(after >= before);
        }

        #[test]
        fn raising_max_rate_never_lowers_rate(
            price in 0.01f64..10_000.0,
            ma in 0.01f64..10_000.0,
            lo in 0.0f64..2.0,
            hi in 0.0f64..3.0,
            bump in 0.0f64..1.0,
        ) {
            let before = base_rate(price, ma, RateBounds { min_rate: lo, max_rate: hi });
            let after = base_rate(price, ma, RateBounds { min_rate: lo, max_rate: hi + bump });
            prop_assert!(after >= before);
        }

        #[test]
        fn shaped_rates_follow_base_rate(
            price in 0.01f64..10_000.0,
            ma in 0.01f64..10_000.0,
            lo in 0.05f64..1.0,
            bump in 0.0f64..1.0,
        ) {
            let low = RateBounds { min_rate: lo, max_rate: 2.0 };
            let high = RateBounds { min_rate: lo + bump, max_rate: 2.0 };
            for f in [RateFunction::Log, RateFunction::Exp] {
                let a = adjust_rate(price, ma, f, low).unwrap();
                let b = adjust_rate(price, ma, f, high).unwrap();
                prop_assert!(b >= a);
            }
        }
    }

    #[test]
    fn ali_boundaries_map_to_lower_tier() {
        assert_eq!(ali_tier(1.0), 0.7);
        assert_eq!(ali_tier(0.5), 0.7);
        assert_eq!(ali_tier(0.15), 0.8);
        assert_eq!(ali_tier(0.0), 1.0);
    }
}
