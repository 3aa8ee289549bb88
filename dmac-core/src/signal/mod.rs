//! Strategy abstraction — target-allocation decision functions.
//!
//! Strategies are portfolio-agnostic: they receive the bar history observed
//! so far and nothing else. The engine stays fully in control of transaction
//! history, so a strategy must not carry hidden cross-call memory of prior
//! signals; its only mutable input is the history slice passed per call.

pub mod ma_crossover;

use crate::domain::Bar;
use serde::{Deserialize, Serialize};

pub use ma_crossover::DualMaCrossover;

/// Binary allocation signal: fully in cash or fully invested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Flat,
    Long,
}

impl Signal {
    /// Target allocation as a fraction of the portfolio.
    pub fn allocation(self) -> f64 {
        match self {
            Signal::Flat => 0.0,
            Signal::Long => 1.0,
        }
    }
}

impl TryFrom<f64> for Signal {
    type Error = f64;

    /// Accepts exactly 0.0 and 1.0. Anything else (fractional targets, NaN)
    /// is unsupported and returned as the error value.
    fn try_from(target: f64) -> Result<Self, f64> {
        if target == 0.0 {
            Ok(Signal::Flat)
        } else if target == 1.0 {
            Ok(Signal::Long)
        } else {
            Err(target)
        }
    }
}

/// Trait for signal-generating strategies.
///
/// # Contract
/// - `history` at step *i* contains exactly the bars with index < *i* —
///   never the bar whose price will execute the transaction.
/// - If `history` is shorter than the strategy's warm-up window, `decide`
///   returns 0.0 (flat) without error.
/// - Only 0.0 and 1.0 are executable targets; the engine rejects anything
///   else with `EngineError::InvalidSignal`.
pub trait Strategy: Send + Sync {
    /// Human-readable name (e.g., "dual_ma_crossover").
    fn name(&self) -> &str;

    /// Target allocation for the upcoming transaction, given the bars
    /// observed so far.
    fn decide(&self, history: &[Bar]) -> f64;
}

/// Always fully invested from the first decision onward. Buy-and-hold
/// baseline, and a stub for engine tests.
pub struct AlwaysLong;

impl Strategy for AlwaysLong {
    fn name(&self) -> &str {
        "always_long"
    }

    fn decide(&self, _history: &[Bar]) -> f64 {
        1.0
    }
}

/// Never invests. All-cash baseline, and a stub for engine tests.
pub struct AlwaysFlat;

impl Strategy for AlwaysFlat {
    fn name(&self) -> &str {
        "always_flat"
    }

    fn decide(&self, _history: &[Bar]) -> f64 {
        0.0
    }
}
