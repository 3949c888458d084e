//! Price and return series.
//!
//! `PriceSeries` is the normalised result of a download regardless of how many
//! tickers were requested. `ReturnSeries` is derived from it once and is the
//! only input the downstream stages consume.

use super::frame::TickerFrame;
use super::provider::DataError;
use crate::stats;

/// Adjusted close prices, one column per ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    frame: TickerFrame,
}

impl PriceSeries {
    pub fn new(frame: TickerFrame) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> &TickerFrame {
        &self.frame
    }

    pub fn tickers(&self) -> &[String] {
        self.frame.tickers()
    }

    pub fn n_rows(&self) -> usize {
        self.frame.n_rows()
    }

    /// Simple daily returns `p[t] / p[t-1] - 1`, first row dropped.
    pub fn returns(&self) -> Result<ReturnSeries, DataError> {
        if self.frame.n_rows() < 2 {
            return Err(DataError::InsufficientRows {
                needed: 2,
                got: self.frame.n_rows(),
            });
        }

        let rows = self.frame.rows();
        let returns: Vec<Vec<f64>> = rows
            .windows(2)
            .map(|w| {
                w[0].iter()
                    .zip(&w[1])
                    .map(|(prev, cur)| cur / prev - 1.0)
                    .collect()
            })
            .collect();

        let frame = TickerFrame::new(
            self.frame.tickers().to_vec(),
            self.frame.dates()[1..].to_vec(),
            returns,
        )?;
        Ok(ReturnSeries { frame })
    }
}

/// Fractional daily returns, one column per ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    frame: TickerFrame,
}

impl ReturnSeries {
    pub fn new(frame: TickerFrame) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> &TickerFrame {
        &self.frame
    }

    pub fn tickers(&self) -> &[String] {
        self.frame.tickers()
    }

    pub fn n_rows(&self) -> usize {
        self.frame.n_rows()
    }

    /// Mean over tickers of each ticker's mean return.
    pub fn mean_return(&self) -> f64 {
        let means: Vec<f64> = self
            .frame
            .columns()
            .iter()
            .map(|c| stats::mean(c))
            .collect();
        stats::mean(&means)
    }

    /// Mean over tickers of each ticker's sample standard deviation.
    pub fn mean_volatility(&self) -> f64 {
        let stds: Vec<f64> = self
            .frame
            .columns()
            .iter()
            .map(|c| stats::sample_std(c))
            .collect();
        stats::mean(&stds)
    }

    /// Rows `[start, start + len)` as a new series.
    pub fn window(&self, start: usize, len: usize) -> ReturnSeries {
        ReturnSeries {
            frame: self.frame.slice_rows(start, len),
        }
    }

    /// Every contiguous window of `len` rows, stride one.
    ///
    /// Yields nothing when `len` is zero or exceeds the series length.
    pub fn rolling(&self, len: usize) -> impl Iterator<Item = ReturnSeries> + '_ {
        let count = if len == 0 || len > self.n_rows() {
            0
        } else {
            self.n_rows() - len + 1
        };
        (0..count).map(move |start| self.window(start, len))
    }
}
