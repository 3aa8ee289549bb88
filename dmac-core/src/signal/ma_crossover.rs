//! Dual moving average crossover strategy.
//!
//! Goes long while the short-window mean of the chosen price field sits
//! above the long-window mean, flat otherwise. Ties resolve to flat.

use crate::domain::{Bar, PriceField};

use super::Strategy;

/// Dual moving average crossover over a single asset.
///
/// Computes the arithmetic mean of the last `short_window` and the last
/// `long_window` values of `price_field` over the supplied history and
/// targets 100% allocation when the short mean is strictly greater.
///
/// # Window ordering
/// `short_window < long_window` is the expected configuration but is not
/// enforced. With `short_window >= long_window` the signal is whatever the
/// means arithmetic produces: each window clamps to the available history,
/// so equal windows compare a mean against itself and stay flat forever.
/// No bullish bias is guaranteed.
#[derive(Debug, Clone)]
pub struct DualMaCrossover {
    short_window: usize,
    long_window: usize,
    price_field: PriceField,
}

impl DualMaCrossover {
    /// Crossover over the close price.
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self::with_price_field(short_window, long_window, PriceField::Close)
    }

    pub fn with_price_field(
        short_window: usize,
        long_window: usize,
        price_field: PriceField,
    ) -> Self {
        assert!(short_window >= 1, "short_window must be >= 1");
        assert!(long_window >= 1, "long_window must be >= 1");
        Self {
            short_window,
            long_window,
            price_field,
        }
    }

    pub fn short_window(&self) -> usize {
        self.short_window
    }

    pub fn long_window(&self) -> usize {
        self.long_window
    }

    /// Mean of the chosen price field over the last `window` bars,
    /// clamped to the available history.
    fn window_mean(&self, history: &[Bar], window: usize) -> f64 {
        let tail = &history[history.len().saturating_sub(window)..];
        let sum: f64 = tail.iter().map(|bar| bar.price(self.price_field)).sum();
        sum / tail.len() as f64
    }
}

impl Strategy for DualMaCrossover {
    fn name(&self) -> &str {
        "dual_ma_crossover"
    }

    fn decide(&self, history: &[Bar]) -> f64 {
        // Warm-up: not enough history for the long window yet.
        if history.len() < self.long_window + 1 {
            return 0.0;
        }

        let short_mean = self.window_mean(history, self.short_window);
        let long_mean = self.window_mean(history, self.long_window);

        if short_mean > long_mean {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::make_bars;

    #[test]
    fn warmup_returns_flat() {
        let strat = DualMaCrossover::new(2, 5);
        // Rising prices would otherwise signal long.
        let bars = make_bars(&[100.0, 110.0, 120.0, 130.0, 140.0]);
        for i in 0..=bars.len() {
            if i < strat.long_window() + 1 {
                assert_eq!(strat.decide(&bars[..i]), 0.0, "history len {i}");
            }
        }
    }

    #[test]
    fn long_when_short_mean_exceeds_long_mean() {
        let strat = DualMaCrossover::new(2, 4);
        // Last 2: mean 125; last 4: mean 115.
        let bars = make_bars(&[100.0, 100.0, 100.0, 110.0, 120.0, 130.0]);
        assert_eq!(strat.decide(&bars), 1.0);
    }

    #[test]
    fn flat_when_short_mean_below_long_mean() {
        let strat = DualMaCrossover::new(2, 4);
        // Last 2: mean 90; last 4: mean 102.5.
        let bars = make_bars(&[130.0, 130.0, 120.0, 110.0, 95.0, 85.0]);
        assert_eq!(strat.decide(&bars), 0.0);
    }

    #[test]
    fn tie_resolves_to_flat() {
        let strat = DualMaCrossover::new(2, 4);
        let bars = make_bars(&[100.0, 100.0, 100.0, 100.0, 100.0]);
        assert_eq!(strat.decide(&bars), 0.0);
    }

    #[test]
    fn crossover_flips_at_known_index() {
        let strat = DualMaCrossover::new(2, 3);
        // Flat regime, then a rally, then a crash.
        let closes = [100.0, 100.0, 100.0, 100.0, 120.0, 140.0, 60.0, 40.0];
        let bars = make_bars(&closes);

        // History through index 5 (rally): short mean 130 > long mean 120.
        assert_eq!(strat.decide(&bars[..6]), 1.0);
        // History through index 7 (crash): short mean 50 < long mean 80.
        assert_eq!(strat.decide(&bars), 0.0);
    }

    #[test]
    fn respects_price_field() {
        let mut bars = make_bars(&[100.0, 100.0, 100.0, 100.0, 100.0]);
        // Closes are all equal (tie → flat), but lows trend up.
        for (i, bar) in bars.iter_mut().enumerate() {
            bar.low = 50.0 + 10.0 * i as f64;
        }
        let on_close = DualMaCrossover::new(2, 4);
        let on_low = DualMaCrossover::with_price_field(2, 4, PriceField::Low);
        assert_eq!(on_close.decide(&bars), 0.0);
        assert_eq!(on_low.decide(&bars), 1.0);
    }

    #[test]
    fn equal_windows_never_signal() {
        // short == long compares a mean against itself.
        let strat = DualMaCrossover::new(3, 3);
        let bars = make_bars(&[100.0, 110.0, 120.0, 130.0, 140.0, 150.0]);
        for i in 0..=bars.len() {
            assert_eq!(strat.decide(&bars[..i]), 0.0);
        }
    }

    #[test]
    fn short_exceeding_long_clamps_to_history() {
        // short > long falls out of the arithmetic; no panic, no validation.
        let strat = DualMaCrossover::new(10, 2);
        let bars = make_bars(&[100.0, 110.0, 120.0]);
        // len 3 >= long + 1; short window clamps to all 3 bars.
        // short mean 110 < long mean 115 → flat.
        assert_eq!(strat.decide(&bars), 0.0);
    }

    #[test]
    #[should_panic(expected = "short_window must be >= 1")]
    fn rejects_zero_short_window() {
        DualMaCrossover::new(0, 10);
    }

    #[test]
    #[should_panic(expected = "long_window must be >= 1")]
    fn rejects_zero_long_window() {
        DualMaCrossover::new(5, 0);
    }
}
