//! TMRisk Core: the numerical heart of the topological martingale risk pipeline.
//!
//! This crate contains:
//! - Price download (Yahoo Finance) normalised into one price table
//! - Daily return series and cross-asset moments
//! - Pearson correlation, correlation distance, and the correlation MST
//! - Vietoris–Rips persistence (H0, H1) over a precomputed distance matrix
//! - Geometric Brownian motion Monte Carlo and European call valuation
//! - Rolling-window topology vs. pricing-error analysis

pub mod data;
pub mod disjoint_set;
pub mod fingerprint;
pub mod integration;
pub mod network;
pub mod pricing;
pub mod rng;
pub mod stats;
pub mod topology;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: data-transfer types can cross thread boundaries.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<data::PriceSeries>();
        require_sync::<data::PriceSeries>();
        require_send::<data::ReturnSeries>();
        require_sync::<data::ReturnSeries>();
        require_send::<network::CorrelationMatrix>();
        require_sync::<network::CorrelationMatrix>();
        require_send::<network::MinimumSpanningTree>();
        require_sync::<network::MinimumSpanningTree>();
        require_send::<topology::PersistenceDiagram>();
        require_sync::<topology::PersistenceDiagram>();
        require_send::<pricing::PathEnsemble>();
        require_sync::<pricing::PathEnsemble>();
        require_send::<integration::IntegrationRecord>();
        require_sync::<integration::IntegrationRecord>();
        require_send::<rng::SimulationSeed>();
        require_sync::<rng::SimulationSeed>();
    }

    /// The provider trait object is usable behind a shared reference.
    #[test]
    fn provider_trait_is_object_safe() {
        fn _takes(_p: &dyn data::PriceProvider) {}
        _takes(&data::InMemoryProvider::new());
    }
}
