//! CSV bar loading and price-string cleanup.
//!
//! Reads daily OHLC bars from a CSV with a `Date,Open,High,Low,Close`
//! header (extra columns are ignored). Price cells may carry thousands
//! grouping commas ("32,760" parses as 32760.0). Rows are sorted ascending
//! by date after parsing; duplicate dates are an error, never deduplicated.

use chrono::NaiveDate;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::domain::Bar;

/// Errors from the bar loading layer. Surfaced to the caller before the
/// engine ever runs; not recoverable within the engine.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column '{name}' in header")]
    MissingColumn { name: String },

    #[error("malformed date '{value}' on line {line}")]
    MalformedDate { value: String, line: u64 },

    #[error("malformed price '{value}' on line {line}")]
    MalformedPrice { value: String, line: u64 },

    #[error("duplicate date {date} in input")]
    DuplicateDate { date: NaiveDate },

    #[error("no data rows in input")]
    Empty,
}

/// Parse a price cell to f64 after stripping grouping separators,
/// surrounding whitespace, and optional quotes.
///
/// Ex: `"32,760"` => `32760.0`.
pub fn clean_price(raw: &str) -> Result<f64, std::num::ParseFloatError> {
    raw.trim().trim_matches('"').replace(',', "").parse()
}

/// Load daily OHLC bars from a CSV file and return them sorted ascending
/// by date.
pub fn load_bars(path: &Path) -> Result<Vec<Bar>, DataError> {
    let mut file = File::open(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;
    parse_bars(&contents)
}

/// Parse bars from CSV text. Split out from [`load_bars`] so tests can run
/// on in-memory input.
pub fn parse_bars(input: &str) -> Result<Vec<Bar>, DataError> {
    let mut reader = csv::Reader::from_reader(input.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| -> Result<usize, DataError> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| DataError::MissingColumn { name: name.into() })
    };
    let date_col = column("Date")?;
    let open_col = column("Open")?;
    let high_col = column("High")?;
    let low_col = column("Low")?;
    let close_col = column("Close")?;

    let mut bars = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());

        let date_raw = record.get(date_col).unwrap_or_default();
        let date = NaiveDate::parse_from_str(date_raw.trim(), "%Y-%m-%d").map_err(|_| {
            DataError::MalformedDate {
                value: date_raw.to_string(),
                line,
            }
        })?;

        let price = |col: usize| -> Result<f64, DataError> {
            let raw = record.get(col).unwrap_or_default();
            clean_price(raw).map_err(|_| DataError::MalformedPrice {
                value: raw.to_string(),
                line,
            })
        };

        bars.push(Bar {
            date,
            open: price(open_col)?,
            high: price(high_col)?,
            low: price(low_col)?,
            close: price(close_col)?,
        });
    }

    if bars.is_empty() {
        return Err(DataError::Empty);
    }

    bars.sort_by_key(|bar| bar.date);
    for pair in bars.windows(2) {
        if pair[0].date == pair[1].date {
            return Err(DataError::DuplicateDate { date: pair[0].date });
        }
    }

    Ok(bars)
}
