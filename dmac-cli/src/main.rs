//! dmac CLI — run, compare, and sweep commands.
//!
//! Commands:
//! - `run` — backtest one bar file with the crossover strategy, export the
//!   result table as CSV
//! - `compare` — backtest two bar files with the same parameters and export
//!   an aligned percent-change comparison
//! - `sweep` — grid-sweep crossover windows over one bar file and print a
//!   leaderboard

mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use dmac_core::data::load_bars;
use dmac_core::domain::{PortfolioState, PriceField};
use dmac_core::engine;
use dmac_core::signal::DualMaCrossover;
use dmac_core::sweep::{run_grid, ParamGrid};

#[derive(Parser)]
#[command(
    name = "dmac",
    about = "dmac CLI — dual moving average crossover backtesting harness"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest one bar file and export the portfolio time series.
    Run {
        /// CSV of daily bars (Date,Open,High,Low,Close).
        #[arg(long)]
        input: PathBuf,

        /// Short lookback window in bars.
        #[arg(long)]
        short: usize,

        /// Long lookback window in bars (should exceed --short).
        #[arg(long)]
        long: usize,

        /// Initial cash.
        #[arg(long, default_value_t = 10_000.0)]
        cash: f64,

        /// OHLC field used for indicators and transactions.
        #[arg(long, default_value_t = PriceField::Close)]
        price_field: PriceField,

        /// Output CSV for the result table.
        #[arg(long, default_value = "result.csv")]
        output: PathBuf,
    },
    /// Backtest two bar files with the same parameters and compare them.
    Compare {
        /// First CSV of daily bars.
        #[arg(long)]
        a: PathBuf,

        /// Second CSV of daily bars.
        #[arg(long)]
        b: PathBuf,

        /// Short lookback window in bars.
        #[arg(long)]
        short: usize,

        /// Long lookback window in bars (should exceed --short).
        #[arg(long)]
        long: usize,

        /// Initial cash per run.
        #[arg(long, default_value_t = 10_000.0)]
        cash: f64,

        /// OHLC field used for indicators and transactions.
        #[arg(long, default_value_t = PriceField::Close)]
        price_field: PriceField,

        /// Output CSV for the percent-change comparison.
        #[arg(long, default_value = "compare.csv")]
        output: PathBuf,
    },
    /// Grid-sweep crossover windows and print a leaderboard.
    Sweep {
        /// CSV of daily bars.
        #[arg(long)]
        input: PathBuf,

        /// Short windows to test (e.g., 10,20,30).
        #[arg(long, value_delimiter = ',', required = true)]
        short: Vec<usize>,

        /// Long windows to test (e.g., 50,100,200).
        #[arg(long, value_delimiter = ',', required = true)]
        long: Vec<usize>,

        /// Initial cash per run.
        #[arg(long, default_value_t = 10_000.0)]
        cash: f64,

        /// OHLC field used for indicators and transactions.
        #[arg(long, default_value_t = PriceField::Close)]
        price_field: PriceField,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            short,
            long,
            cash,
            price_field,
            output,
        } => run_cmd(&input, short, long, cash, price_field, &output),
        Commands::Compare {
            a,
            b,
            short,
            long,
            cash,
            price_field,
            output,
        } => compare_cmd(&a, &b, short, long, cash, price_field, &output),
        Commands::Sweep {
            input,
            short,
            long,
            cash,
            price_field,
        } => sweep_cmd(&input, short, long, cash, price_field),
    }
}

fn backtest_file(
    input: &Path,
    short: usize,
    long: usize,
    cash: f64,
    price_field: PriceField,
) -> Result<Vec<PortfolioState>> {
    let bars = load_bars(input).with_context(|| format!("loading bars from {}", input.display()))?;
    let strategy = DualMaCrossover::with_price_field(short, long, price_field);
    let states = engine::run(&bars, &strategy, cash, price_field)
        .with_context(|| format!("backtest failed for {}", input.display()))?;
    Ok(states)
}

fn run_cmd(
    input: &Path,
    short: usize,
    long: usize,
    cash: f64,
    price_field: PriceField,
    output: &Path,
) -> Result<()> {
    let states = backtest_file(input, short, long, cash, price_field)?;
    report::write_states_csv(output, &states)?;

    let label = stem(input);
    println!("{}", report::summarize(&label, &states));
    println!("result table written to {}", output.display());
    Ok(())
}

fn compare_cmd(
    a: &Path,
    b: &Path,
    short: usize,
    long: usize,
    cash: f64,
    price_field: PriceField,
    output: &Path,
) -> Result<()> {
    let states_a = backtest_file(a, short, long, cash, price_field)?;
    let states_b = backtest_file(b, short, long, cash, price_field)?;

    let label_a = stem(a);
    let label_b = stem(b);
    report::write_comparison_csv(output, &label_a, &states_a, &label_b, &states_b)?;

    println!("dual ma crossover ({short}, {long}) on {price_field}");
    println!("{}", report::summarize(&label_a, &states_a));
    println!("{}", report::summarize(&label_b, &states_b));
    println!("comparison written to {}", output.display());
    Ok(())
}

fn sweep_cmd(
    input: &Path,
    short: Vec<usize>,
    long: Vec<usize>,
    cash: f64,
    price_field: PriceField,
) -> Result<()> {
    let bars = load_bars(input).with_context(|| format!("loading bars from {}", input.display()))?;
    let grid = ParamGrid {
        short_windows: short,
        long_windows: long,
    };
    let outcomes = run_grid(&bars, &grid, cash, price_field)?;

    if outcomes.is_empty() {
        println!("grid is empty (every pair had short >= long)");
        return Ok(());
    }

    println!("{:>8} {:>8} {:>14} {:>10}", "short", "long", "final", "return");
    for outcome in &outcomes {
        println!(
            "{:>8} {:>8} {:>14.2} {:>9.2}%",
            outcome.short_window, outcome.long_window, outcome.final_value, outcome.return_pct
        );
    }
    Ok(())
}

/// File stem used as a series label in summaries and CSV headers.
fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
