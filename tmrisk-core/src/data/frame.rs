//! Date-indexed, ticker-keyed table of `f64` values.

use super::provider::DataError;
use chrono::NaiveDate;

/// Rectangular table: one row per date, one column per ticker.
///
/// Dates are strictly ascending. Every row has exactly `tickers.len()` values.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerFrame {
    tickers: Vec<String>,
    dates: Vec<NaiveDate>,
    rows: Vec<Vec<f64>>,
}

impl TickerFrame {
    pub fn new(
        tickers: Vec<String>,
        dates: Vec<NaiveDate>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, DataError> {
        if dates.len() != rows.len() {
            return Err(DataError::ShapeMismatch(format!(
                "{} dates but {} rows",
                dates.len(),
                rows.len()
            )));
        }
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != tickers.len())
        {
            return Err(DataError::ShapeMismatch(format!(
                "row {i} has {} values, expected {}",
                row.len(),
                tickers.len()
            )));
        }
        if let Some(w) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(DataError::ShapeMismatch(format!(
                "dates not strictly ascending: {} then {}",
                w[0], w[1]
            )));
        }
        Ok(Self {
            tickers,
            dates,
            rows,
        })
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one ticker column, in date order.
    pub fn column(&self, idx: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r[idx]).collect()
    }

    /// All columns, ticker-major.
    pub fn columns(&self) -> Vec<Vec<f64>> {
        (0..self.n_cols()).map(|c| self.column(c)).collect()
    }

    /// Contiguous row slice `[start, start + len)`. Panics when out of range.
    pub fn slice_rows(&self, start: usize, len: usize) -> TickerFrame {
        TickerFrame {
            tickers: self.tickers.clone(),
            dates: self.dates[start..start + len].to_vec(),
            rows: self.rows[start..start + len].to_vec(),
        }
    }
}
