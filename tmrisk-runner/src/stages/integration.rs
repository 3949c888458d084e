//! Stage 5: rolling topology vs. pricing-error table and scatter plot.

use super::load_returns;
use crate::artifacts::ArtifactLayout;
use crate::plot::render_integration_scatter;
use anyhow::{Context, Result};
use std::path::Path;
use tmrisk_core::integration::{rolling_analysis, IntegrationRecord, RollingParams};
use tracing::warn;

pub fn run(layout: &ArtifactLayout, params: &RollingParams) -> Result<Vec<IntegrationRecord>> {
    layout.ensure_dirs()?;
    let returns = load_returns(layout)?;

    if returns.n_rows() < params.window {
        warn!(
            rows = returns.n_rows(),
            window = params.window,
            "return series shorter than the rolling window; integration table will be empty"
        );
    }
    let records = rolling_analysis(&returns, params).context("Rolling integration failed")?;

    write_records(&layout.integration_csv(), &records)?;
    render_integration_scatter(&layout.integration_plot(), &records)
        .with_context(|| format!("Failed to render {}", layout.integration_plot().display()))?;
    Ok(records)
}

pub fn write_records(path: &Path, records: &[IntegrationRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    if records.is_empty() {
        // serialize() emits headers lazily; keep the header for empty tables
        wtr.write_record(["WindowStart", "WindowEnd", "H1_TotalPersistence", "PricingError"])?;
    }
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_records(path: &Path) -> Result<Vec<IntegrationRecord>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    rdr.deserialize()
        .collect::<Result<Vec<IntegrationRecord>, _>>()
        .with_context(|| format!("Failed to parse {}", path.display()))
}
