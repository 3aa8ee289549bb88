//! PortfolioState — one row of the backtest result table.

use chrono::NaiveDate;
use serde::Serialize;

/// Portfolio snapshot after processing one bar.
///
/// Accounting identity: `portfolio_value == cash_value + asset_value` at
/// every row. Allocation is strictly binary, so at most one of `cash_value`
/// and `asset_shares` is nonzero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioState {
    pub date: NaiveDate,
    pub cash_value: f64,
    pub asset_shares: f64,
    pub asset_value: f64,
    pub portfolio_value: f64,
}

impl PortfolioState {
    /// The state emitted for the first bar: all cash, no shares.
    pub fn initial(date: NaiveDate, cash: f64) -> Self {
        Self {
            date,
            cash_value: cash,
            asset_shares: 0.0,
            asset_value: 0.0,
            portfolio_value: cash,
        }
    }

    /// Whether the portfolio holds the asset at this row.
    pub fn is_invested(&self) -> bool {
        self.asset_shares > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_all_cash() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let state = PortfolioState::initial(date, 10_000.0);
        assert_eq!(state.cash_value, 10_000.0);
        assert_eq!(state.asset_shares, 0.0);
        assert_eq!(state.asset_value, 0.0);
        assert_eq!(state.portfolio_value, 10_000.0);
        assert!(!state.is_invested());
    }
}
