//! Stage 4: full-period Monte Carlo call price.

use super::load_returns;
use crate::artifacts::ArtifactLayout;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tmrisk_core::pricing::{price_call, CallPricing, CallPricingParams};

#[derive(Debug, Serialize, Deserialize)]
struct PriceRow {
    #[serde(rename = "MC_Call")]
    mc_call: f64,
}

pub fn run(layout: &ArtifactLayout, params: &CallPricingParams) -> Result<CallPricing> {
    layout.ensure_dirs()?;
    let returns = load_returns(layout)?;
    let pricing = price_call(&returns, params).context("Monte Carlo pricing failed")?;
    write_price(&layout.mc_pricing_csv(), pricing.estimate.price)?;
    Ok(pricing)
}

fn write_price(path: &Path, price: f64) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.serialize(PriceRow { mc_call: price })?;
    wtr.flush()?;
    Ok(())
}

/// The single `MC_Call` value from a pricing table.
pub fn read_price(path: &Path) -> Result<f64> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let row: PriceRow = rdr
        .deserialize()
        .next()
        .with_context(|| format!("{} has no price row", path.display()))??;
    Ok(row.mc_call)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_file_has_single_mc_call_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mc_pricing.csv");
        write_price(&path, 8.25).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "MC_Call\n8.25\n");
        assert_eq!(read_price(&path).unwrap(), 8.25);
    }
}
