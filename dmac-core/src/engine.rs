//! Backtest engine — bar-by-bar state machine over an ordered bar series.
//!
//! Each step queries the strategy with the history observed so far (never
//! the current bar), converts the target allocation into a binary position,
//! applies the frictionless transaction at the current bar's price, and
//! emits one portfolio state row. The engine is pure: given the same series
//! and strategy it always produces the same result, and it never mutates
//! the series.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{Bar, PortfolioState, PriceField};
use crate::signal::{Signal, Strategy};

/// Errors from a backtest run. All are fatal; the computation is
/// deterministic, so an error is a caller bug, not a transient fault.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Strategy produced a target outside {0.0, 1.0}. The engine cannot
    /// decide how to apply a fractional allocation, so the run aborts.
    #[error("strategy '{name}' returned unsupported target allocation {target} at {date}; only 0.0 (flat) and 1.0 (long) are executable")]
    InvalidSignal {
        name: String,
        target: f64,
        date: NaiveDate,
    },

    #[error("bar series is empty")]
    EmptySeries,

    #[error("bar dates must be strictly increasing: {prev} is not before {next}")]
    NonMonotonicDates { prev: NaiveDate, next: NaiveDate },

    #[error("initial cash must be non-negative, got {cash}")]
    NegativeInitialCash { cash: f64 },

    /// A transaction price was zero, negative, or non-finite. Converting
    /// cash into shares divides by the price, so the engine fails loudly
    /// rather than producing a silently wrong series.
    #[error("transaction price must be positive and finite, got {price} at {date}")]
    NonPositivePrice { price: f64, date: NaiveDate },
}

/// Check the series preconditions: non-empty, strictly increasing dates.
///
/// Violations are caller bugs; the engine never infers missing dates or
/// drops bad rows.
pub fn validate_series(series: &[Bar]) -> Result<(), EngineError> {
    if series.is_empty() {
        return Err(EngineError::EmptySeries);
    }
    for pair in series.windows(2) {
        if pair[0].date >= pair[1].date {
            return Err(EngineError::NonMonotonicDates {
                prev: pair[0].date,
                next: pair[1].date,
            });
        }
    }
    Ok(())
}

/// Run a backtest over `series` with `strategy`, starting from
/// `initial_cash` held entirely as cash.
///
/// Returns one `PortfolioState` per bar. The first row is the initial
/// state (all cash, always flat). For each later bar *i* the strategy is
/// queried with `series[..i]` and its target executes at
/// `series[i].price(price_field)`:
///
/// - flat: liquidate any held shares into cash at that price;
/// - long: convert all cash into shares at that price.
///
/// The reallocation itself is frictionless — no value is created or
/// destroyed by switching; only subsequent price movement changes value.
pub fn run(
    series: &[Bar],
    strategy: &dyn Strategy,
    initial_cash: f64,
    price_field: PriceField,
) -> Result<Vec<PortfolioState>, EngineError> {
    validate_series(series)?;
    if initial_cash < 0.0 || initial_cash.is_nan() {
        return Err(EngineError::NegativeInitialCash { cash: initial_cash });
    }

    let mut states = Vec::with_capacity(series.len());
    states.push(PortfolioState::initial(series[0].date, initial_cash));

    let mut cash = initial_cash;
    let mut shares = 0.0_f64;

    for i in 1..series.len() {
        let bar = &series[i];

        // History strictly excludes the bar whose price executes the trade.
        let target = strategy.decide(&series[..i]);
        let signal = Signal::try_from(target).map_err(|target| EngineError::InvalidSignal {
            name: strategy.name().to_string(),
            target,
            date: bar.date,
        })?;

        let price = bar.price(price_field);
        if !price.is_finite() || price <= 0.0 {
            return Err(EngineError::NonPositivePrice {
                price,
                date: bar.date,
            });
        }

        match signal {
            Signal::Flat => {
                cash += shares * price;
                shares = 0.0;
            }
            Signal::Long => {
                shares += cash / price;
                cash = 0.0;
            }
        }

        let asset_value = shares * price;
        states.push(PortfolioState {
            date: bar.date,
            cash_value: cash,
            asset_shares: shares,
            asset_value,
            portfolio_value: asset_value + cash,
        });
    }

    Ok(states)
}
