//! Monte Carlo pricing under geometric Brownian motion.
//!
//! Drift and volatility come from cross-asset averages of the return series:
//! `mu` is the mean of per-asset mean returns, `sigma` the mean of per-asset
//! sample standard deviations. The call is discounted at `mu` as well.

pub mod gbm;
pub mod option;

pub use gbm::{simulate_gbm, GbmParams, PathEnsemble};
pub use option::{black_scholes_call, monte_carlo_call, CallEstimate};

use crate::data::ReturnSeries;
use crate::rng::SimulationSeed;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("invalid pricing parameter: {0}")]
    InvalidParameter(String),

    #[error("return series has {0} rows; need at least 2 to estimate volatility")]
    TooFewReturns(usize),
}

/// Fixed inputs of the full-period call valuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallPricingParams {
    pub initial_price: f64,
    pub horizon_years: f64,
    pub steps: usize,
    pub n_paths: usize,
    pub seed: SimulationSeed,
}

impl Default for CallPricingParams {
    fn default() -> Self {
        Self {
            initial_price: 100.0,
            horizon_years: 1.0,
            steps: 252,
            n_paths: 1000,
            seed: SimulationSeed::new(42),
        }
    }
}

/// Outcome of pricing an at-the-money call from a return series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallPricing {
    pub mu: f64,
    pub sigma: f64,
    pub estimate: CallEstimate,
    /// Black–Scholes with rate = `mu`, for comparison.
    pub black_scholes: f64,
}

/// Price a European call struck at the initial price.
pub fn price_call(
    returns: &ReturnSeries,
    params: &CallPricingParams,
) -> Result<CallPricing, PricingError> {
    if returns.n_rows() < 2 {
        return Err(PricingError::TooFewReturns(returns.n_rows()));
    }
    if params.steps == 0 || params.horizon_years <= 0.0 {
        return Err(PricingError::InvalidParameter(format!(
            "steps ({}) and horizon ({}) must be positive",
            params.steps, params.horizon_years
        )));
    }

    let mu = returns.mean_return();
    let sigma = returns.mean_volatility();

    let gbm = GbmParams::over_horizon(params.initial_price, mu, sigma, params.horizon_years, params.steps);
    let ensemble = simulate_gbm(&gbm, params.n_paths, params.seed)?;

    let strike = params.initial_price;
    let estimate = monte_carlo_call(&ensemble, strike, mu, params.horizon_years);
    let black_scholes = black_scholes_call(params.initial_price, strike, mu, sigma, params.horizon_years);

    info!(
        mu,
        sigma,
        price = estimate.price,
        std_error = estimate.std_error,
        black_scholes,
        seed = params.seed.value(),
        "monte carlo call priced"
    );

    Ok(CallPricing {
        mu,
        sigma,
        estimate,
        black_scholes,
    })
}
