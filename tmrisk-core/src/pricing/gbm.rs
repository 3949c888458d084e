//! Discretised geometric Brownian motion.
//!
//! `S(t) = S(t-1) * exp((mu - sigma^2 / 2) dt + sigma sqrt(dt) Z)`, with a
//! fresh standard normal `Z` per path per step. Normals are drawn one time
//! step at a time across all paths.

use super::PricingError;
use crate::rng::SimulationSeed;
use rand::Rng;
use rand_distr::StandardNormal;

/// GBM dynamics and discretisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GbmParams {
    pub s0: f64,
    pub mu: f64,
    pub sigma: f64,
    pub dt: f64,
    pub steps: usize,
}

impl GbmParams {
    /// `steps` equal increments covering `horizon` years.
    pub fn over_horizon(s0: f64, mu: f64, sigma: f64, horizon: f64, steps: usize) -> Self {
        Self {
            s0,
            mu,
            sigma,
            dt: horizon / steps.max(1) as f64,
            steps,
        }
    }

    fn validate(&self) -> Result<(), PricingError> {
        if !self.s0.is_finite() || !self.mu.is_finite() {
            return Err(PricingError::InvalidParameter(format!(
                "s0 and mu must be finite (s0={}, mu={})",
                self.s0, self.mu
            )));
        }
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(PricingError::InvalidParameter(format!(
                "sigma must be finite and nonnegative, got {}",
                self.sigma
            )));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(PricingError::InvalidParameter(format!(
                "dt must be positive, got {}",
                self.dt
            )));
        }
        Ok(())
    }
}

/// `(steps + 1) x n_paths` grid of simulated prices, row-major by time step.
#[derive(Debug, Clone)]
pub struct PathEnsemble {
    steps: usize,
    n_paths: usize,
    prices: Vec<f64>,
}

impl PathEnsemble {
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Prices of every path at time step `step`.
    pub fn step(&self, step: usize) -> &[f64] {
        &self.prices[step * self.n_paths..(step + 1) * self.n_paths]
    }

    pub fn terminal(&self) -> &[f64] {
        self.step(self.steps)
    }

    pub fn mean_terminal(&self) -> f64 {
        let t = self.terminal();
        t.iter().sum::<f64>() / t.len() as f64
    }
}

/// Simulate `n_paths` independent GBM paths from a fresh RNG seeded with `seed`.
pub fn simulate_gbm(
    params: &GbmParams,
    n_paths: usize,
    seed: SimulationSeed,
) -> Result<PathEnsemble, PricingError> {
    params.validate()?;
    if n_paths == 0 {
        return Err(PricingError::InvalidParameter("n_paths must be > 0".into()));
    }

    let drift = (params.mu - 0.5 * params.sigma * params.sigma) * params.dt;
    let diffusion = params.sigma * params.dt.sqrt();

    let mut rng = seed.rng();
    let mut prices = Vec::with_capacity((params.steps + 1) * n_paths);
    prices.resize(n_paths, params.s0);

    for t in 1..=params.steps {
        let prev = (t - 1) * n_paths;
        for p in 0..n_paths {
            let z: f64 = rng.sample(StandardNormal);
            let next = prices[prev + p] * (drift + diffusion * z).exp();
            prices.push(next);
        }
    }

    Ok(PathEnsemble {
        steps: params.steps,
        n_paths,
        prices,
    })
}
