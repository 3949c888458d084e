//! The five pipeline stages.
//!
//! Each stage reads what earlier stages wrote under the [`ArtifactLayout`],
//! computes its typed result, persists it, and returns it to the caller.
//!
//! [`ArtifactLayout`]: crate::artifacts::ArtifactLayout

pub mod integration;
pub mod network;
pub mod prepare;
pub mod pricing;
pub mod topology;

use crate::artifacts::ArtifactLayout;
use anyhow::{Context, Result};
use tmrisk_core::data::ReturnSeries;

/// Read the return table written by the prepare stage.
pub fn load_returns(layout: &ArtifactLayout) -> Result<ReturnSeries> {
    let path = layout.returns_csv();
    ReturnSeries::read_csv(&path).with_context(|| {
        format!(
            "Failed to read returns from {} (has the prepare stage run?)",
            path.display()
        )
    })
}
