//! Stage 3: Rips persistence of the full-period correlation distances.

use super::load_returns;
use crate::artifacts::ArtifactLayout;
use crate::config::TopologyConfig;
use crate::plot::render_persistence_histogram;
use anyhow::{Context, Result};
use std::path::Path;
use tmrisk_core::network::CorrelationMatrix;
use tmrisk_core::topology::{rips_persistence, LifetimeHistogram, PersistenceDiagram};
use tracing::info;

pub fn run(layout: &ArtifactLayout, config: &TopologyConfig) -> Result<PersistenceDiagram> {
    layout.ensure_dirs()?;
    let returns = load_returns(layout)?;

    let distances = CorrelationMatrix::from_returns(&returns).to_distance();
    let diagram = rips_persistence(&distances);

    write_diagram(&layout.persistence_json(), &diagram)?;

    let histograms = LifetimeHistogram::per_dimension(&diagram, config.histogram_bins);
    render_persistence_histogram(&layout.persistence_plot(), &histograms)
        .with_context(|| format!("Failed to render {}", layout.persistence_plot().display()))?;

    info!(
        h0 = diagram.count(0),
        h1 = diagram.count(1),
        h1_total = diagram.total_persistence(1),
        "persistence diagram computed"
    );
    Ok(diagram)
}

pub fn write_diagram(path: &Path, diagram: &PersistenceDiagram) -> Result<()> {
    let json = serde_json::to_string_pretty(diagram)
        .context("Failed to serialize persistence diagram")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write diagram to {}", path.display()))?;
    Ok(())
}

pub fn read_diagram(path: &Path) -> Result<PersistenceDiagram> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).context("Failed to parse persistence diagram")
}
