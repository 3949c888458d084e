//! Stage 2: correlation matrix, MST, and the network figure.

use super::load_returns;
use crate::artifacts::ArtifactLayout;
use crate::plot::render_mst;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tmrisk_core::data::ReturnSeries;
use tmrisk_core::network::{CorrelationGraph, CorrelationMatrix, MinimumSpanningTree};
use tracing::info;

#[derive(Debug, Clone)]
pub struct NetworkOutput {
    pub correlation: CorrelationMatrix,
    pub mst: MinimumSpanningTree,
}

pub fn build(returns: &ReturnSeries) -> NetworkOutput {
    let correlation = CorrelationMatrix::from_returns(returns);
    let mst = CorrelationGraph::from_correlation(&correlation).minimum_spanning_tree();
    NetworkOutput { correlation, mst }
}

pub fn run(layout: &ArtifactLayout) -> Result<NetworkOutput> {
    layout.ensure_dirs()?;
    let returns = load_returns(layout)?;
    let out = build(&returns);

    write_correlation_csv(&layout.correlation_csv(), &out.correlation)?;
    write_mst_edges_csv(&layout.mst_edges_csv(), &out.mst)?;
    render_mst(&layout.mst_plot(), &out.mst)
        .with_context(|| format!("Failed to render {}", layout.mst_plot().display()))?;

    info!(
        nodes = out.mst.tickers().len(),
        edges = out.mst.edges().len(),
        total_weight = out.mst.total_weight(),
        "correlation MST built"
    );
    Ok(out)
}

fn write_correlation_csv(path: &Path, corr: &CorrelationMatrix) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut header = vec!["Ticker".to_string()];
    header.extend(corr.tickers().iter().cloned());
    wtr.write_record(&header)?;

    for (ticker, row) in corr.tickers().iter().zip(corr.values()) {
        let mut record = vec![ticker.clone()];
        record.extend(row.iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct EdgeRow<'a> {
    source: &'a str,
    target: &'a str,
    weight: f64,
}

fn write_mst_edges_csv(path: &Path, mst: &MinimumSpanningTree) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for (source, target, weight) in mst.named_edges() {
        wtr.serialize(EdgeRow { source, target, weight })?;
    }
    wtr.flush()?;
    Ok(())
}
