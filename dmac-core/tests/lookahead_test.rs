//! Look-ahead contamination tests for the backtest loop.
//!
//! Invariant: the strategy queried at bar i sees exactly `series[0..i]` —
//! never the bar whose price executes the transaction, never anything later.
//!
//! Two methods:
//! 1. A probe strategy records every history slice it is handed.
//! 2. Running on a truncated series must reproduce the full-series result
//!    prefix row for row. Any difference means future bars leaked backward.

use chrono::NaiveDate;
use std::sync::Mutex;

use dmac_core::domain::{Bar, PriceField};
use dmac_core::engine::run;
use dmac_core::signal::{DualMaCrossover, Strategy};

fn make_test_bars(n: usize) -> Vec<Bar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0_f64;

    for i in 0..n {
        // Deterministic pseudo-random walk using a simple LCG.
        let seed = (i as u64)
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05;
        price = (price + change).max(10.0);

        bars.push(Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open: price - 0.5,
            high: price + 2.0,
            low: price - 2.0,
            close: price,
        });
    }

    bars
}

/// Probe strategy: records the length and last date of every history slice.
struct Probe {
    observed: Mutex<Vec<(usize, Option<NaiveDate>)>>,
}

impl Probe {
    fn new() -> Self {
        Self {
            observed: Mutex::new(Vec::new()),
        }
    }
}

impl Strategy for Probe {
    fn name(&self) -> &str {
        "probe"
    }

    fn decide(&self, history: &[Bar]) -> f64 {
        self.observed
            .lock()
            .unwrap()
            .push((history.len(), history.last().map(|b| b.date)));
        0.0
    }
}

#[test]
fn strategy_sees_exactly_the_prefix() {
    let bars = make_test_bars(50);
    let probe = Probe::new();
    run(&bars, &probe, 10_000.0, PriceField::Close).unwrap();

    let observed = probe.observed.lock().unwrap();
    // One query per transition bar: histories of length 1..=49, in order.
    assert_eq!(observed.len(), bars.len() - 1);
    for (step, (len, last_date)) in observed.iter().enumerate() {
        let i = step + 1;
        assert_eq!(*len, i, "history at bar {i} has the wrong length");
        // The newest visible bar is the one before the execution bar.
        assert_eq!(*last_date, Some(bars[i - 1].date));
        assert!(last_date.unwrap() < bars[i].date);
    }
}

#[test]
fn truncated_run_matches_full_run_prefix() {
    let bars = make_test_bars(200);
    let strategy = DualMaCrossover::new(10, 30);

    let full = run(&bars, &strategy, 10_000.0, PriceField::Close).unwrap();
    let truncated = run(&bars[..100], &strategy, 10_000.0, PriceField::Close).unwrap();

    assert_eq!(full.len(), 200);
    assert_eq!(truncated.len(), 100);
    for i in 0..100 {
        assert_eq!(
            full[i], truncated[i],
            "row {i} differs between full and truncated runs"
        );
    }
}
