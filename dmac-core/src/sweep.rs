//! Parameter sweeps over crossover window grids.
//!
//! The bar series is read-only, so independent runs share it across rayon
//! workers without locking; each run exclusively owns its own output.

use rayon::prelude::*;
use serde::Serialize;

use crate::domain::{Bar, PriceField};
use crate::engine::{self, EngineError};
use crate::signal::DualMaCrossover;

/// Grid of crossover windows to test.
#[derive(Debug, Clone)]
pub struct ParamGrid {
    pub short_windows: Vec<usize>,
    pub long_windows: Vec<usize>,
}

impl ParamGrid {
    /// All `(short, long)` pairs in the grid. Pairs with `short >= long`
    /// are skipped.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for &short in &self.short_windows {
            for &long in &self.long_windows {
                if short >= long {
                    continue;
                }
                pairs.push((short, long));
            }
        }
        pairs
    }
}

/// Outcome of one sweep run.
#[derive(Debug, Clone, Serialize)]
pub struct SweepOutcome {
    pub short_window: usize,
    pub long_window: usize,
    pub final_value: f64,
    /// Total return over the run, as a percentage of initial cash.
    /// Zero when initial cash is zero.
    pub return_pct: f64,
}

/// Run one backtest per grid pair, in parallel, and return the outcomes
/// sorted by descending final portfolio value.
///
/// Any failing run aborts the whole sweep.
pub fn run_grid(
    series: &[Bar],
    grid: &ParamGrid,
    initial_cash: f64,
    price_field: PriceField,
) -> Result<Vec<SweepOutcome>, EngineError> {
    let mut outcomes = grid
        .pairs()
        .into_par_iter()
        .map(|(short, long)| {
            let strategy = DualMaCrossover::with_price_field(short, long, price_field);
            let states = engine::run(series, &strategy, initial_cash, price_field)?;
            // `run` guarantees at least the initial row.
            let final_value = states.last().map_or(initial_cash, |s| s.portfolio_value);
            let return_pct = if initial_cash > 0.0 {
                100.0 * (final_value - initial_cash) / initial_cash
            } else {
                0.0
            };
            Ok(SweepOutcome {
                short_window: short,
                long_window: long,
                final_value,
                return_pct,
            })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    outcomes.sort_by(|a, b| b.final_value.total_cmp(&a.final_value));
    Ok(outcomes)
}
