//! Run manifest (JSON) written after the last stage succeeds.

use crate::artifacts::ArtifactLayout;
use crate::config::PipelineConfig;
use crate::pipeline::Stage;
use crate::stages::{self, prepare::PrepareRequest};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tmrisk_core::fingerprint::frame_hash;

pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageTiming {
    pub stage: Stage,
    pub duration_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    pub requested_tickers: Vec<String>,
    /// Tickers actually present in the return table, in column order.
    pub tickers: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub config: PipelineConfig,
    pub return_rows: usize,
    pub returns_hash: String,
    pub mc_call: f64,
    pub integration_windows: usize,
    pub stages: Vec<StageTiming>,
    pub artifacts: Vec<PathBuf>,
}

impl RunManifest {
    /// Summarise a finished run from the files it left in `layout`.
    pub fn collect(
        layout: &ArtifactLayout,
        request: &PrepareRequest,
        config: PipelineConfig,
        stages: Vec<StageTiming>,
    ) -> Result<Self> {
        let returns = stages::load_returns(layout)?;
        let mc_call = stages::pricing::read_price(&layout.mc_pricing_csv())?;
        let integration_windows = stages::integration::read_records(&layout.integration_csv())?.len();

        Ok(Self {
            schema_version: MANIFEST_SCHEMA_VERSION,
            created_at: Utc::now(),
            requested_tickers: request.tickers.clone(),
            tickers: returns.tickers().to_vec(),
            start: request.start,
            end: request.end,
            config,
            return_rows: returns.n_rows(),
            returns_hash: frame_hash(returns.frame()),
            mc_call,
            integration_windows,
            stages,
            artifacts: layout.outputs(),
        })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize run manifest")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write manifest to {}", path.display()))?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest from {}", path.display()))?;
        serde_json::from_str(&json).context("Failed to parse run manifest")
    }
}
