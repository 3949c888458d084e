//! Stage 1: download adjusted closes, derive returns, persist both tables.

use crate::artifacts::ArtifactLayout;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tmrisk_core::data::{download_prices, DownloadProgress, PriceProvider, PriceSeries, ReturnSeries};
use tracing::info;

/// User inputs consumed only by this stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareRequest {
    pub tickers: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct Prepared {
    pub prices: PriceSeries,
    pub returns: ReturnSeries,
}

pub fn run(
    layout: &ArtifactLayout,
    provider: &dyn PriceProvider,
    request: &PrepareRequest,
    progress: &dyn DownloadProgress,
) -> Result<Prepared> {
    layout.ensure_dirs()?;

    let prices = download_prices(provider, &request.tickers, request.start, request.end, progress)
        .with_context(|| {
            format!(
                "Failed to download prices for {:?} ({} to {})",
                request.tickers, request.start, request.end
            )
        })?;
    let returns = prices.returns().context("Failed to compute daily returns")?;

    prices
        .write_csv(&layout.prices_csv())
        .with_context(|| format!("Failed to write {}", layout.prices_csv().display()))?;
    returns
        .write_csv(&layout.returns_csv())
        .with_context(|| format!("Failed to write {}", layout.returns_csv().display()))?;

    info!(
        tickers = prices.tickers().len(),
        price_rows = prices.n_rows(),
        return_rows = returns.n_rows(),
        "price and return tables saved"
    );
    Ok(Prepared { prices, returns })
}
