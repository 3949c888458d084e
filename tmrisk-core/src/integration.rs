//! Rolling-window comparison of market topology and Monte Carlo pricing error.
//!
//! For every contiguous window of returns (stride one) two scalars are
//! computed independently:
//!
//! - **H1 total persistence**: sum of loop lifetimes in the Rips diagram of
//!   the window's correlation-distance matrix.
//! - **Pricing error**: a zero-drift GBM started at the window's mean return,
//!   run for `window - 1` steps of `dt = 1 / window`, compared against that
//!   same mean return.
//!
//! The seed is reset for every window, so all windows share one normal stream.

use crate::data::ReturnSeries;
use crate::network::CorrelationMatrix;
use crate::pricing::{simulate_gbm, GbmParams, PricingError};
use crate::rng::SimulationSeed;
use crate::topology::rips_persistence;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("rolling window must span at least 2 rows, got {0}")]
    WindowTooShort(usize),

    #[error("window starting {start}: {source}")]
    Pricing {
        start: NaiveDate,
        #[source]
        source: PricingError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollingParams {
    pub window: usize,
    pub n_paths: usize,
    pub seed: SimulationSeed,
}

impl Default for RollingParams {
    fn default() -> Self {
        Self {
            window: 60,
            n_paths: 1000,
            seed: SimulationSeed::new(42),
        }
    }
}

/// One row of the integration table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegrationRecord {
    #[serde(rename = "WindowStart")]
    pub window_start: NaiveDate,
    #[serde(rename = "WindowEnd")]
    pub window_end: NaiveDate,
    #[serde(rename = "H1_TotalPersistence")]
    pub h1_total_persistence: f64,
    #[serde(rename = "PricingError")]
    pub pricing_error: f64,
}

/// Sum of H1 lifetimes of a window's correlation-distance Rips diagram.
pub fn h1_total_persistence(window: &ReturnSeries) -> f64 {
    let dist = CorrelationMatrix::from_returns(window).to_distance();
    rips_persistence(&dist).total_persistence(1)
}

/// `|mean simulated terminal value - mean return|` for one window.
pub fn window_pricing_error(
    window: &ReturnSeries,
    n_paths: usize,
    seed: SimulationSeed,
) -> Result<f64, PricingError> {
    let len = window.n_rows();
    let mean_return = window.mean_return();
    let params = GbmParams {
        s0: mean_return,
        mu: 0.0,
        sigma: window.mean_volatility(),
        dt: 1.0 / len as f64,
        steps: len.saturating_sub(1),
    };
    let ensemble = simulate_gbm(&params, n_paths, seed)?;
    Ok((ensemble.mean_terminal() - mean_return).abs())
}

/// Evaluate every window. Series shorter than the window yield no records.
pub fn rolling_analysis(
    returns: &ReturnSeries,
    params: &RollingParams,
) -> Result<Vec<IntegrationRecord>, IntegrationError> {
    if params.window < 2 {
        return Err(IntegrationError::WindowTooShort(params.window));
    }

    let mut records = Vec::with_capacity(returns.n_rows().saturating_sub(params.window - 1));
    for window in returns.rolling(params.window) {
        let dates = window.frame().dates();
        let (window_start, window_end) = (dates[0], dates[dates.len() - 1]);

        let h1 = h1_total_persistence(&window);
        let pricing_error = window_pricing_error(&window, params.n_paths, params.seed)
            .map_err(|source| IntegrationError::Pricing {
                start: window_start,
                source,
            })?;

        debug!(%window_start, h1, pricing_error, "window evaluated");
        records.push(IntegrationRecord {
            window_start,
            window_end,
            h1_total_persistence: h1,
            pricing_error,
        });
    }

    info!(
        windows = records.len(),
        window = params.window,
        rows = returns.n_rows(),
        "rolling integration complete"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TickerFrame;

    fn returns(n: usize, k: usize) -> ReturnSeries {
        let dates = (0..n as u64)
            .map(|i| NaiveDate::from_ymd_opt(2022, 1, 3).unwrap() + chrono::Days::new(i))
            .collect();
        let rows = (0..n)
            .map(|i| {
                (0..k)
                    .map(|j| 0.01 * ((i * (j + 2)) as f64 * 0.37 + j as f64).sin())
                    .collect()
            })
            .collect();
        let tickers = (0..k).map(|j| format!("T{j}")).collect();
        ReturnSeries::new(TickerFrame::new(tickers, dates, rows).unwrap())
    }

    #[test]
    fn one_record_per_window() {
        let r = returns(100, 3);
        let params = RollingParams { n_paths: 50, ..RollingParams::default() };
        let records = rolling_analysis(&r, &params).unwrap();
        assert_eq!(records.len(), 100 - 59);
        assert_eq!(records[0].window_start, r.frame().dates()[0]);
        assert_eq!(records[0].window_end, r.frame().dates()[59]);
        assert!(records.iter().all(|rec| rec.pricing_error >= 0.0));
        assert!(records.iter().all(|rec| rec.h1_total_persistence >= 0.0));
    }

    #[test]
    fn short_series_yields_empty_table() {
        let r = returns(30, 2);
        let records = rolling_analysis(&r, &RollingParams::default()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn two_tickers_have_no_loops() {
        let r = returns(80, 2);
        let params = RollingParams { n_paths: 20, ..RollingParams::default() };
        let records = rolling_analysis(&r, &params).unwrap();
        assert!(records.iter().all(|rec| rec.h1_total_persistence == 0.0));
    }

    /// Returns repeating every `period` rows.
    fn periodic_returns(n: usize, k: usize, period: usize) -> ReturnSeries {
        let dates = (0..n as u64)
            .map(|i| NaiveDate::from_ymd_opt(2022, 1, 3).unwrap() + chrono::Days::new(i))
            .collect();
        let rows = (0..n)
            .map(|i| {
                let phase = (i % period) as f64;
                (0..k)
                    .map(|j| 0.01 * (phase * 0.61 * (j + 1) as f64 + j as f64).sin())
                    .collect()
            })
            .collect();
        let tickers = (0..k).map(|j| format!("T{j}")).collect();
        ReturnSeries::new(TickerFrame::new(tickers, dates, rows).unwrap())
    }

    #[test]
    fn seed_is_reset_for_every_window() {
        let period = 10;
        let r = periodic_returns(90, 3, period);
        let params = RollingParams { window: 30, n_paths: 200, ..RollingParams::default() };
        let records = rolling_analysis(&r, &params).unwrap();
        assert_eq!(records.len(), 90 - 29);

        // windows `period` rows apart hold identical data
        for i in 0..records.len() - period {
            assert_eq!(records[i].pricing_error, records[i + period].pricing_error);
            assert_eq!(
                records[i].h1_total_persistence,
                records[i + period].h1_total_persistence
            );
        }
        assert_ne!(records[0].pricing_error, records[1].pricing_error);
    }

    #[test]
    fn window_of_one_rejected() {
        let r = returns(10, 2);
        let params = RollingParams { window: 1, ..RollingParams::default() };
        assert!(matches!(
            rolling_analysis(&r, &params),
            Err(IntegrationError::WindowTooShort(1))
        ));
    }
}
