//! dmac-core — single-asset all-in/all-out backtesting engine.
//!
//! This crate contains the heart of the harness:
//! - Domain types (OHLC bars, portfolio state rows)
//! - Strategy trait with a dual moving average crossover reference strategy
//! - Bar-by-bar backtest loop with frictionless binary allocation
//! - CSV bar loading and cleanup
//! - Parallel parameter sweeps over crossover window grids

pub mod data;
pub mod domain;
pub mod engine;
pub mod signal;
pub mod sweep;
