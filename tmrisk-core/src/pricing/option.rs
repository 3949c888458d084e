//! European call valuation: Monte Carlo estimate and Black–Scholes reference.

use super::gbm::PathEnsemble;
use statrs::function::erf::erf;

/// Discounted Monte Carlo call price with its standard error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallEstimate {
    pub price: f64,
    pub std_error: f64,
    pub n_paths: usize,
}

/// `exp(-rate * horizon) * mean(max(S_T - strike, 0))` over the ensemble's terminal prices.
pub fn monte_carlo_call(
    ensemble: &PathEnsemble,
    strike: f64,
    rate: f64,
    horizon: f64,
) -> CallEstimate {
    let discount = (-rate * horizon).exp();
    let payoffs: Vec<f64> = ensemble
        .terminal()
        .iter()
        .map(|s| (s - strike).max(0.0))
        .collect();

    let n = payoffs.len();
    let mean = payoffs.iter().sum::<f64>() / n as f64;
    let std_error = if n > 1 {
        let var = payoffs.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        discount * (var / n as f64).sqrt()
    } else {
        0.0
    };

    CallEstimate {
        price: discount * mean,
        std_error,
        n_paths: n,
    }
}

fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Black–Scholes price of a European call.
///
/// Degenerate inputs (zero volatility or horizon) collapse to discounted intrinsic value.
pub fn black_scholes_call(spot: f64, strike: f64, rate: f64, sigma: f64, horizon: f64) -> f64 {
    let discount = (-rate * horizon).exp();
    if sigma <= 0.0 || horizon <= 0.0 {
        return (spot - strike * discount).max(0.0);
    }
    let vol_t = sigma * horizon.sqrt();
    let d1 = ((spot / strike).ln() + (rate + 0.5 * sigma * sigma) * horizon) / vol_t;
    let d2 = d1 - vol_t;
    spot * norm_cdf(d1) - strike * discount * norm_cdf(d2)
}
