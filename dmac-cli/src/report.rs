//! Result table export and run summaries.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use dmac_core::domain::PortfolioState;

/// Write the backtest result table with the same columns the engine
/// accumulates: Date, Cash Value, Asset Shares, Asset Value, Portfolio Value.
pub fn write_states_csv(path: &Path, states: &[PortfolioState]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("failed to create result CSV {}", path.display()))?;
    writeln!(file, "Date,Cash Value,Asset Shares,Asset Value,Portfolio Value")?;
    for state in states {
        writeln!(
            file,
            "{},{:.4},{:.6},{:.4},{:.4}",
            state.date,
            state.cash_value,
            state.asset_shares,
            state.asset_value,
            state.portfolio_value
        )?;
    }
    Ok(())
}

/// Portfolio value of each row as a percentage of the first row.
pub fn percent_change(states: &[PortfolioState]) -> Vec<f64> {
    let base = states.first().map_or(0.0, |s| s.portfolio_value);
    if base == 0.0 {
        return vec![0.0; states.len()];
    }
    states
        .iter()
        .map(|s| 100.0 * s.portfolio_value / base)
        .collect()
}

/// Write two percent-change series side by side for comparison. Series may
/// cover different date ranges; rows past the end of a series are left blank.
pub fn write_comparison_csv(
    path: &Path,
    label_a: &str,
    a: &[PortfolioState],
    label_b: &str,
    b: &[PortfolioState],
) -> Result<()> {
    let pct_a = percent_change(a);
    let pct_b = percent_change(b);

    let mut file = File::create(path)
        .with_context(|| format!("failed to create comparison CSV {}", path.display()))?;
    writeln!(
        file,
        "{label_a} Date,{label_a} %,{label_b} Date,{label_b} %"
    )?;

    let rows = a.len().max(b.len());
    for i in 0..rows {
        let left = match (a.get(i), pct_a.get(i)) {
            (Some(state), Some(pct)) => format!("{},{:.4}", state.date, pct),
            _ => ",".to_string(),
        };
        let right = match (b.get(i), pct_b.get(i)) {
            (Some(state), Some(pct)) => format!("{},{:.4}", state.date, pct),
            _ => ",".to_string(),
        };
        writeln!(file, "{left},{right}")?;
    }
    Ok(())
}

/// One-line run summary: initial value, final value, total return.
pub fn summarize(label: &str, states: &[PortfolioState]) -> String {
    let initial = states.first().map_or(0.0, |s| s.portfolio_value);
    let last = states.last().map_or(0.0, |s| s.portfolio_value);
    let ret = if initial > 0.0 {
        100.0 * (last - initial) / initial
    } else {
        0.0
    };
    format!("{label}: initial {initial:.2}, final {last:.2}, return {ret:+.2}%")
}
